//! Request, result and grounding types shared by the generator, the
//! renderer and the session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::render::is_safe_link;

/// Kind of content the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    /// Markdown article rendered as rich text
    Article,
    /// Self-contained HTML document rendered in a sandboxed frame
    #[default]
    Webpage,
}

impl OutputType {
    /// File extension used for downloads
    pub fn extension(self) -> &'static str {
        match self {
            OutputType::Article => "md",
            OutputType::Webpage => "html",
        }
    }

    /// Media type used for downloads
    pub fn media_type(self) -> &'static str {
        match self {
            OutputType::Article => "text/markdown",
            OutputType::Webpage => "text/html",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputType::Article => "article",
            OutputType::Webpage => "webpage",
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "article" => Ok(OutputType::Article),
            "webpage" => Ok(OutputType::Webpage),
            other => Err(format!("unknown output type '{other}'")),
        }
    }
}

/// What the user submitted from the input view
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub idea: String,
    pub reference_url: String,
    pub output_type: OutputType,
}

impl GenerationRequest {
    pub fn new(
        idea: impl Into<String>,
        reference_url: impl Into<String>,
        output_type: OutputType,
    ) -> Self {
        Self {
            idea: idea.into(),
            reference_url: reference_url.into(),
            output_type,
        }
    }

    /// At least one of idea and URL carries non-whitespace text
    pub fn is_submittable(&self) -> bool {
        !self.idea.trim().is_empty() || !self.reference_url.trim().is_empty()
    }

    /// Reference URL, `None` when blank
    pub fn reference_url(&self) -> Option<&str> {
        let url = self.reference_url.trim();
        (!url.is_empty()).then_some(url)
    }
}

/// Grounding metadata returned by a search-augmented generation.
///
/// Mirrors the service's `groundingMetadata` object; absent lists
/// deserialize as empty and unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroundingChunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WebSource {
    #[serde(default)]
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A chunk that can be rendered as a link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLink<'a> {
    pub uri: &'a str,
    pub label: &'a str,
}

impl GroundingChunk {
    pub fn web(uri: impl Into<String>, title: Option<&str>) -> Self {
        Self {
            web: Some(WebSource {
                uri: uri.into(),
                title: title.map(str::to_string),
            }),
        }
    }

    /// Link for this chunk, `None` when it carries no usable URI
    pub fn source_link(&self) -> Option<SourceLink<'_>> {
        let web = self.web.as_ref()?;
        let uri = web.uri.trim();
        if uri.is_empty() || !is_safe_link(uri) {
            return None;
        }
        let label = web
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(uri);
        Some(SourceLink { uri, label })
    }
}

impl GroundingMetadata {
    /// Usable sources in service order
    pub fn sources(&self) -> impl Iterator<Item = SourceLink<'_>> {
        self.grounding_chunks
            .iter()
            .filter_map(GroundingChunk::source_link)
    }

    pub fn has_sources(&self) -> bool {
        self.sources().next().is_some()
    }
}

/// Raw output of one generation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Generated text, not yet de-fenced
    pub text: String,
    pub grounding_metadata: Option<GroundingMetadata>,
}

/// Sources of an optional grounding block
pub fn usable_sources(grounding: Option<&GroundingMetadata>) -> Vec<SourceLink<'_>> {
    grounding.map(|g| g.sources().collect()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_idea_and_url_are_not_submittable() {
        let req = GenerationRequest::new("   ", "\n\t", OutputType::Article);
        assert!(!req.is_submittable());
        assert!(GenerationRequest::new("solar", "", OutputType::Article).is_submittable());
        assert!(GenerationRequest::new("", "https://x.test", OutputType::Webpage).is_submittable());
    }

    #[test]
    fn blank_reference_url_reads_as_none() {
        let req = GenerationRequest::new("idea", "  ", OutputType::Article);
        assert_eq!(req.reference_url(), None);
        let req = GenerationRequest::new("", " https://x.test ", OutputType::Article);
        assert_eq!(req.reference_url(), Some("https://x.test"));
    }

    #[test]
    fn output_type_parses_and_maps_to_files() {
        assert_eq!("Article".parse::<OutputType>(), Ok(OutputType::Article));
        assert_eq!("webpage".parse::<OutputType>(), Ok(OutputType::Webpage));
        assert!("pdf".parse::<OutputType>().is_err());
        assert_eq!(OutputType::default(), OutputType::Webpage);
        assert_eq!(OutputType::Webpage.extension(), "html");
        assert_eq!(OutputType::Article.media_type(), "text/markdown");
    }

    #[test]
    fn grounding_deserializes_with_absent_fields() {
        let meta: GroundingMetadata = serde_json::from_value(serde_json::json!({
            "groundingChunks": [
                {"web": {"uri": "https://a.example", "title": "A"}},
                {"web": {"uri": "https://b.example"}},
                {"retrievedContext": {"uri": "gs://bucket"}},
                {"web": {"title": "no uri"}}
            ],
            "webSearchQueries": ["q"]
        }))
        .unwrap();

        assert_eq!(meta.grounding_chunks.len(), 4);
        let sources: Vec<_> = meta.sources().collect();
        assert_eq!(
            sources,
            vec![
                SourceLink { uri: "https://a.example", label: "A" },
                SourceLink { uri: "https://b.example", label: "https://b.example" },
            ]
        );

        let empty: GroundingMetadata = serde_json::from_str("{}").unwrap();
        assert!(!empty.has_sources());
    }

    #[test]
    fn blank_title_falls_back_to_uri() {
        let chunk = GroundingChunk::web("https://c.example", Some("  "));
        assert_eq!(chunk.source_link().unwrap().label, "https://c.example");
    }

    #[test]
    fn script_uris_are_not_usable_sources() {
        let meta = GroundingMetadata {
            grounding_chunks: vec![GroundingChunk::web("javascript:alert(1)", Some("X"))],
        };
        assert!(!meta.has_sources());
        assert!(usable_sources(Some(&meta)).is_empty());
    }
}
