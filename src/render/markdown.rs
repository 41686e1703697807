//! Markdown article rendering using pulldown_cmark.
//!
//! Raw HTML inside the Markdown is shown as text and link targets are
//! limited to safe schemes, since the article is rendered into the host
//! page rather than a sandboxed frame.

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};

use super::is_safe_link;

fn safe_destination(dest: CowStr<'_>) -> CowStr<'_> {
    if is_safe_link(&dest) {
        dest
    } else {
        CowStr::Borrowed("")
    }
}

/// Render a Markdown article to HTML. Never fails: malformed input renders
/// as whatever CommonMark makes of it.
pub fn article_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);

    let events = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_destination(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_destination(dest_url),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}
