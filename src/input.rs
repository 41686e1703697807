//! Input collection: the form payload and its submit gate.

use serde::Deserialize;

use crate::model::{GenerationRequest, OutputType};

/// Form body posted by the input view
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub idea: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub output_type: OutputType,
}

impl SubmitForm {
    /// The request to forward, or `None` when both fields are blank and the
    /// submit must be ignored
    pub fn into_request(self) -> Option<GenerationRequest> {
        let request = GenerationRequest::new(self.idea, self.url, self.output_type);
        request.is_submittable().then_some(request)
    }
}

/// Whether the submit control is enabled
pub fn can_submit(idea: &str, url: &str, is_generating: bool) -> bool {
    !is_generating && (!idea.trim().is_empty() || !url.trim().is_empty())
}

/// Values shown in the input fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputDraft {
    pub idea: String,
    pub url: String,
    pub output_type: OutputType,
}

impl From<&GenerationRequest> for InputDraft {
    fn from(request: &GenerationRequest) -> Self {
        Self {
            idea: request.idea.clone(),
            url: request.reference_url.clone(),
            output_type: request.output_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_form_yields_no_request() {
        let form = SubmitForm {
            idea: "  ".into(),
            url: "".into(),
            output_type: OutputType::Article,
        };
        assert!(form.into_request().is_none());
    }

    #[test]
    fn url_only_form_is_forwarded() {
        let form = SubmitForm {
            idea: String::new(),
            url: "https://example.com/x".into(),
            output_type: OutputType::Webpage,
        };
        let req = form.into_request().unwrap();
        assert_eq!(req.reference_url(), Some("https://example.com/x"));
        assert_eq!(req.output_type, OutputType::Webpage);
    }

    #[test]
    fn submit_is_disabled_while_generating_or_empty() {
        assert!(can_submit("idea", "", false));
        assert!(can_submit("", "https://x.test", false));
        assert!(!can_submit("idea", "", true));
        assert!(!can_submit(" ", "\t", false));
    }
}
