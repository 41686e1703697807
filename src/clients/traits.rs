use async_trait::async_trait;
use thiserror::Error;

use crate::model::{GenerationRequest, GenerationResult};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no API key configured for the generation service")]
    MissingCredential,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("generation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("service rejected credentials ({status}): {message}")]
    Auth { status: u16, message: String },
    #[error("quota exhausted: {message}")]
    Quota { message: String },
    #[error("service error {status}: {message}")]
    Service { status: u16, message: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Produces long-form content for a request
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError>;

    /// Model identifier reported by `/info`
    fn model(&self) -> &str;
}
