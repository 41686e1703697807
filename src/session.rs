//! View model for one browser session.
//!
//! Phases and the events that move between them:
//!
//! ```text
//! Idle | AwaitingInput | Error | Displaying --submit--> Generating
//! Generating --success--> Displaying
//! Generating --failure--> Error
//! anything but Generating --reset--> AwaitingInput
//! ```
//!
//! A submit while `Generating` is refused, which is what keeps at most one
//! generation in flight.

use serde::Serialize;

use crate::error::{IdeaForgeError, Result};
use crate::input::InputDraft;
use crate::model::{GenerationRequest, GenerationResult, GroundingMetadata, OutputType, SourceLink};
use crate::render::{self, Download, FrameHandle, FrameRegistry};

/// Text shown when the service returns nothing
pub const EMPTY_CONTENT_PLACEHOLDER: &str = "No content generated.";

/// A result on screen
#[derive(Debug)]
pub struct Displayed {
    pub content: String,
    pub output_type: OutputType,
    pub grounding: Option<GroundingMetadata>,
    frame: Option<FrameHandle>,
}

impl Displayed {
    /// `src` of the sandboxed frame, webpages only
    pub fn frame_src(&self) -> Option<String> {
        self.frame.as_ref().map(FrameHandle::src)
    }

    pub fn prepared(&self) -> String {
        render::prepare(&self.content, self.output_type, self.grounding.as_ref())
    }

    pub fn download(&self) -> Download {
        render::download(&self.content, self.output_type, self.grounding.as_ref())
    }

    pub fn sources(&self) -> Vec<SourceLink<'_>> {
        crate::model::usable_sources(self.grounding.as_ref())
    }
}

#[derive(Debug)]
pub enum Phase {
    /// Fresh session
    Idle,
    /// Back on the input view after a reset
    AwaitingInput,
    Generating,
    Displaying(Displayed),
    Error(String),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::AwaitingInput => "awaiting_input",
            Phase::Generating => "generating",
            Phase::Displaying(_) => "displaying",
            Phase::Error(_) => "error",
        }
    }
}

#[derive(Debug)]
pub enum SessionEvent {
    Submit(GenerationRequest),
    Success(GenerationResult),
    Failure(String),
    Reset,
}

impl SessionEvent {
    fn name(&self) -> &'static str {
        match self {
            SessionEvent::Submit(_) => "submit",
            SessionEvent::Success(_) => "success",
            SessionEvent::Failure(_) => "failure",
            SessionEvent::Reset => "reset",
        }
    }
}

/// Flat snapshot of the session for views and tests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub content: Option<String>,
    pub output_type: OutputType,
    pub is_generating: bool,
    pub error: Option<String>,
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug)]
pub struct Session {
    phase: Phase,
    output_type: OutputType,
    draft: InputDraft,
    frames: FrameRegistry,
}

impl Session {
    pub fn new(frames: FrameRegistry) -> Self {
        Self {
            phase: Phase::Idle,
            output_type: OutputType::default(),
            draft: InputDraft::default(),
            frames,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.phase, Phase::Generating)
    }

    pub fn displayed(&self) -> Option<&Displayed> {
        match &self.phase {
            Phase::Displaying(displayed) => Some(displayed),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Field values for the input view
    pub fn draft(&self) -> &InputDraft {
        &self.draft
    }

    pub fn view_state(&self) -> ViewState {
        let displayed = self.displayed();
        ViewState {
            content: displayed.map(|d| d.content.clone()),
            output_type: self.output_type,
            is_generating: self.is_generating(),
            error: self.error().map(str::to_string),
            grounding_metadata: displayed.and_then(|d| d.grounding.clone()),
        }
    }

    pub fn apply(&mut self, event: SessionEvent) -> Result<()> {
        let invalid = IdeaForgeError::InvalidTransition {
            event: event.name(),
            phase: self.phase.name(),
        };
        match event {
            SessionEvent::Submit(request) => {
                if self.is_generating() {
                    return Err(IdeaForgeError::Busy);
                }
                if !request.is_submittable() {
                    return Err(IdeaForgeError::Validation {
                        message: "idea and reference URL are both empty".to_string(),
                    });
                }
                self.output_type = request.output_type;
                self.draft = InputDraft::from(&request);
                // Replacing a displayed result drops its frame
                self.phase = Phase::Generating;
            }
            SessionEvent::Success(result) => {
                if !self.is_generating() {
                    return Err(invalid);
                }
                let content = if result.text.trim().is_empty() {
                    EMPTY_CONTENT_PLACEHOLDER.to_string()
                } else {
                    result.text
                };
                let grounding = result.grounding_metadata;
                let frame = match self.output_type {
                    OutputType::Webpage => Some(self.frames.acquire(render::prepare(
                        &content,
                        OutputType::Webpage,
                        grounding.as_ref(),
                    ))),
                    OutputType::Article => None,
                };
                self.phase = Phase::Displaying(Displayed {
                    content,
                    output_type: self.output_type,
                    grounding,
                    frame,
                });
            }
            SessionEvent::Failure(message) => {
                if !self.is_generating() {
                    return Err(invalid);
                }
                self.phase = Phase::Error(message);
            }
            SessionEvent::Reset => {
                if self.is_generating() {
                    return Err(invalid);
                }
                self.draft = InputDraft::default();
                self.phase = Phase::AwaitingInput;
            }
        }
        Ok(())
    }

    pub fn submit(&mut self, request: GenerationRequest) -> Result<()> {
        self.apply(SessionEvent::Submit(request))
    }

    pub fn succeed(&mut self, result: GenerationResult) -> Result<()> {
        self.apply(SessionEvent::Success(result))
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<()> {
        self.apply(SessionEvent::Failure(message.into()))
    }

    pub fn reset(&mut self) -> Result<()> {
        self.apply(SessionEvent::Reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GroundingChunk;

    fn webpage_result() -> GenerationResult {
        GenerationResult {
            text: "<html><body><h1>Hi</h1></body></html>".into(),
            grounding_metadata: Some(GroundingMetadata {
                grounding_chunks: vec![GroundingChunk::web("https://a.example", Some("A"))],
            }),
        }
    }

    #[test]
    fn starts_idle_and_empty() {
        let session = Session::new(FrameRegistry::new());
        assert!(matches!(session.phase(), Phase::Idle));
        assert_eq!(
            session.view_state(),
            ViewState {
                content: None,
                output_type: OutputType::Webpage,
                is_generating: false,
                error: None,
                grounding_metadata: None,
            }
        );
    }

    #[test]
    fn second_submit_while_generating_is_busy() {
        let mut session = Session::new(FrameRegistry::new());
        session
            .submit(GenerationRequest::new("a", "", OutputType::Article))
            .unwrap();
        let err = session
            .submit(GenerationRequest::new("b", "", OutputType::Article))
            .unwrap_err();
        assert!(matches!(err, IdeaForgeError::Busy));
        assert_eq!(session.draft().idea, "a");
    }

    #[test]
    fn blank_submit_is_rejected_without_leaving_idle() {
        let mut session = Session::new(FrameRegistry::new());
        let err = session.submit(GenerationRequest::default()).unwrap_err();
        assert!(matches!(err, IdeaForgeError::Validation { .. }));
        assert!(matches!(session.phase(), Phase::Idle));
    }

    #[test]
    fn success_outside_generation_is_invalid() {
        let mut session = Session::new(FrameRegistry::new());
        let err = session.succeed(webpage_result()).unwrap_err();
        assert!(matches!(
            err,
            IdeaForgeError::InvalidTransition {
                event: "success",
                phase: "idle"
            }
        ));
        assert!(session.fail("x").is_err());
    }

    #[test]
    fn webpage_success_holds_a_frame_until_reset() {
        let frames = FrameRegistry::new();
        let mut session = Session::new(frames.clone());
        session
            .submit(GenerationRequest::new("tides", "", OutputType::Webpage))
            .unwrap();
        session.succeed(webpage_result()).unwrap();

        let displayed = session.displayed().unwrap();
        assert!(displayed.frame_src().unwrap().starts_with("/frame/"));
        assert_eq!(frames.len(), 1);
        assert_eq!(displayed.sources().len(), 1);

        session.reset().unwrap();
        assert!(frames.is_empty());
        assert!(matches!(session.phase(), Phase::AwaitingInput));
        let state = session.view_state();
        assert!(state.content.is_none() && state.grounding_metadata.is_none() && state.error.is_none());
    }

    #[test]
    fn new_submit_releases_the_previous_frame() {
        let frames = FrameRegistry::new();
        let mut session = Session::new(frames.clone());
        session
            .submit(GenerationRequest::new("one", "", OutputType::Webpage))
            .unwrap();
        session.succeed(webpage_result()).unwrap();
        assert_eq!(frames.len(), 1);

        session
            .submit(GenerationRequest::new("two", "", OutputType::Webpage))
            .unwrap();
        assert!(frames.is_empty());
    }

    #[test]
    fn article_success_has_no_frame_and_empty_text_gets_placeholder() {
        let frames = FrameRegistry::new();
        let mut session = Session::new(frames.clone());
        session
            .submit(GenerationRequest::new("x", "", OutputType::Article))
            .unwrap();
        session.succeed(GenerationResult::default()).unwrap();
        let displayed = session.displayed().unwrap();
        assert_eq!(displayed.content, EMPTY_CONTENT_PLACEHOLDER);
        assert!(displayed.frame_src().is_none());
        assert!(frames.is_empty());
    }

    #[test]
    fn failure_keeps_draft_and_shows_message() {
        let mut session = Session::new(FrameRegistry::new());
        session
            .submit(GenerationRequest::new("x", "https://x.test", OutputType::Article))
            .unwrap();
        session.fail("Failed").unwrap();
        let state = session.view_state();
        assert_eq!(state.error.as_deref(), Some("Failed"));
        assert!(state.content.is_none());
        assert!(!state.is_generating);
        assert_eq!(state.output_type, OutputType::Article);
        assert_eq!(session.draft().url, "https://x.test");
    }

    #[test]
    fn reset_during_generation_is_refused() {
        let mut session = Session::new(FrameRegistry::new());
        session
            .submit(GenerationRequest::new("x", "", OutputType::Article))
            .unwrap();
        assert!(session.reset().is_err());
        assert!(session.is_generating());
    }
}
