//! Result rendering: fence cleanup, source injection, display and download.
//!
//! `prepare` is the single path used both for what the browser shows and
//! for what the download contains, so the two never diverge.

pub mod frame;
pub mod markdown;

pub use frame::{FrameHandle, FrameRegistry};
pub use markdown::article_html;

use crate::model::{GroundingMetadata, OutputType, SourceLink, usable_sources};

/// Filename stem of every download
pub const DOWNLOAD_STEM: &str = "generated-idea";

const FENCE: &str = "```";

const SAFE_SCHEMES: [&str; 3] = ["http:", "https:", "mailto:"];

/// Whether a link target may be emitted into rendered HTML: http(s),
/// mailto, or a scheme-less (relative or fragment) reference
pub fn is_safe_link(dest: &str) -> bool {
    let trimmed = dest.trim();
    let scheme_end = trimmed.find(|c: char| matches!(c, ':' | '/' | '?' | '#'));
    let has_scheme = scheme_end.is_some_and(|i| trimmed[i..].starts_with(':'));
    if !has_scheme {
        return true;
    }
    let lower = trimmed.to_ascii_lowercase();
    SAFE_SCHEMES.iter().any(|s| lower.starts_with(s))
}

/// Escape text for HTML element content and quoted attributes
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Content after an opening `html` or untagged fence line, if there is one
fn strip_opening_fence(content: &str) -> Option<&str> {
    let (first, rest) = match content.split_once('\n') {
        Some((first, rest)) => (first, rest),
        None => (content, ""),
    };
    let tag = first.trim_end().strip_prefix(FENCE)?;
    if tag.is_empty() || tag.eq_ignore_ascii_case("html") {
        Some(rest)
    } else {
        None
    }
}

/// Drop a final line that is only a fence marker
fn strip_closing_fence(content: &str) -> &str {
    let trimmed = content.trim_end();
    match trimmed.rsplit_once('\n') {
        Some((body, last)) if last.trim() == FENCE => body.trim_end_matches('\r'),
        None if trimmed == FENCE => "",
        _ => content,
    }
}

/// Remove code-fence wrapping the generator sometimes adds despite
/// instructions. Content without a leading fence is returned unchanged.
pub fn normalize(content: &str) -> String {
    let mut current = content;
    while let Some(rest) = strip_opening_fence(current) {
        current = strip_closing_fence(rest);
    }
    current.to_string()
}

/// HTML footer listing the given sources
pub fn sources_footer_html(sources: &[SourceLink<'_>]) -> String {
    let mut items = String::new();
    for source in sources {
        items.push_str(&format!(
            "      <li style=\"display: flex; gap: 0.5rem; align-items: center;\">\
<span style=\"opacity: 0.5;\" aria-hidden=\"true\">\u{1F517}</span>\
<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" \
style=\"color: inherit; opacity: 0.7; font-size: 0.9rem; text-decoration: underline;\">{}</a></li>\n",
            escape_html(source.uri),
            escape_html(source.label)
        ));
    }
    format!(
        "\n<footer style=\"margin: 4rem auto 0; padding: 2rem 0 4rem; max-width: 800px; \
border-top: 1px solid rgba(0,0,0,0.1); font-family: system-ui, sans-serif;\">\n  \
<h3 style=\"font-size: 1.2rem; font-weight: 600; margin-bottom: 1rem; opacity: 0.8;\">Sources &amp; References</h3>\n  \
<ul style=\"list-style: none; padding: 0; margin: 0; display: grid; gap: 0.5rem;\">\n{items}  </ul>\n</footer>\n"
    )
}

/// Markdown section listing the given sources
pub fn sources_markdown(sources: &[SourceLink<'_>]) -> String {
    let mut section = String::from("\n\n## Sources & References\n\n");
    for source in sources {
        let label = source
            .label
            .replace('\\', "\\\\")
            .replace('[', "\\[")
            .replace(']', "\\]");
        section.push_str(&format!("- [{}](<{}>)\n", label, source.uri));
    }
    section
}

/// Add a sources section when the grounding carries at least one usable
/// chunk. Webpages get the footer just before `</body>` (or appended);
/// articles get a trailing Markdown section.
pub fn inject_sources(
    content: String,
    output_type: OutputType,
    grounding: Option<&GroundingMetadata>,
) -> String {
    let sources = usable_sources(grounding);
    if sources.is_empty() {
        return content;
    }
    match output_type {
        OutputType::Webpage => {
            let footer = sources_footer_html(&sources);
            // ASCII lowercasing keeps byte offsets intact
            match content.to_ascii_lowercase().rfind("</body>") {
                Some(idx) => {
                    let mut out = String::with_capacity(content.len() + footer.len());
                    out.push_str(&content[..idx]);
                    out.push_str(&footer);
                    out.push_str(&content[idx..]);
                    out
                }
                None => content + &footer,
            }
        }
        OutputType::Article => content + &sources_markdown(&sources),
    }
}

/// Normalized and source-injected content, as displayed and downloaded
pub fn prepare(
    content: &str,
    output_type: OutputType,
    grounding: Option<&GroundingMetadata>,
) -> String {
    inject_sources(normalize(content), output_type, grounding)
}

/// A file ready to be saved by the browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub media_type: &'static str,
    pub body: String,
}

impl Download {
    pub fn content_type(&self) -> String {
        format!("{}; charset=utf-8", self.media_type)
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name)
    }
}

pub fn download(
    content: &str,
    output_type: OutputType,
    grounding: Option<&GroundingMetadata>,
) -> Download {
    Download {
        file_name: format!("{DOWNLOAD_STEM}.{}", output_type.extension()),
        media_type: output_type.media_type(),
        body: prepare(content, output_type, grounding),
    }
}
