//! Domain-specific error types for idea-forge

use axum::http::StatusCode;
use thiserror::Error;

use crate::clients::GenerationError;

/// Message shown to the user for any failed generation
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate content. Please try again.";

/// Main error type for idea-forge
#[derive(Error, Debug)]
pub enum IdeaForgeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Both idea and URL were blank at submit time
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// A generation is already in flight for this session
    #[error("A generation is already in progress")]
    Busy,

    #[error("Generation service error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Invalid state transition: {event} while {phase}")]
    InvalidTransition {
        event: &'static str,
        phase: &'static str,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl IdeaForgeError {
    /// Status used when the error reaches the HTTP layer
    pub fn status_code(&self) -> StatusCode {
        match self {
            IdeaForgeError::Validation { .. } => StatusCode::BAD_REQUEST,
            IdeaForgeError::Busy | IdeaForgeError::InvalidTransition { .. } => {
                StatusCode::CONFLICT
            }
            IdeaForgeError::Generation(_) => StatusCode::BAD_GATEWAY,
            IdeaForgeError::Config { .. } | IdeaForgeError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Text safe to show in the UI; detail only goes to the logs
    pub fn user_message(&self) -> &'static str {
        match self {
            IdeaForgeError::Validation { .. } => "Enter an idea or a reference URL.",
            IdeaForgeError::Busy => "A generation is already in progress.",
            _ => GENERATION_FAILED_MESSAGE,
        }
    }
}

impl From<anyhow::Error> for IdeaForgeError {
    fn from(err: anyhow::Error) -> Self {
        IdeaForgeError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for IdeaForgeError {
    fn from(err: toml::de::Error) -> Self {
        IdeaForgeError::Config {
            message: err.to_string(),
        }
    }
}

/// Result type alias for idea-forge operations
pub type Result<T> = std::result::Result<T, IdeaForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_failures_share_one_banner() {
        let errs = [
            IdeaForgeError::Generation(GenerationError::MissingCredential),
            IdeaForgeError::Generation(GenerationError::Quota {
                message: "exhausted".into(),
            }),
            IdeaForgeError::Internal {
                message: "boom".into(),
            },
        ];
        for err in errs {
            assert_eq!(err.user_message(), GENERATION_FAILED_MESSAGE);
        }
    }

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(
            IdeaForgeError::Validation {
                message: "empty".into()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(IdeaForgeError::Busy.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            IdeaForgeError::Generation(GenerationError::Timeout { timeout_ms: 5 }).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }
}
