//! Orchestration: input → generator → renderer, with a reset path.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::clients::ContentGenerator;
use crate::error::{GENERATION_FAILED_MESSAGE, IdeaForgeError, Result};
use crate::model::GenerationRequest;
use crate::render::{Download, FrameRegistry};
use crate::session::{Session, ViewState};

/// Owns the session and drives generations against a [`ContentGenerator`]
#[derive(Clone)]
pub struct Forge {
    generator: Arc<dyn ContentGenerator>,
    session: Arc<Mutex<Session>>,
}

impl Forge {
    pub fn new(generator: Arc<dyn ContentGenerator>, frames: FrameRegistry) -> Self {
        Self {
            generator,
            session: Arc::new(Mutex::new(Session::new(frames))),
        }
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    /// Run one generation for `request`.
    ///
    /// Blank requests and submits during a generation are refused before
    /// the generator is called. The call itself runs on its own task, so
    /// it completes and lands in the session even if the caller goes away.
    /// A failed call leaves the generic banner in the session and returns
    /// the underlying error.
    pub async fn submit(&self, request: GenerationRequest) -> Result<()> {
        self.session.lock().await.submit(request.clone())?;
        tracing::info!(
            "Generation started (type={}, url={})",
            request.output_type,
            request.reference_url().is_some()
        );

        let generator = Arc::clone(&self.generator);
        let session = Arc::clone(&self.session);
        let task = tokio::spawn(async move {
            let outcome = generator.generate(&request).await;
            let mut session = session.lock().await;
            match outcome {
                Ok(result) => {
                    tracing::info!("Generation finished ({} chars)", result.text.len());
                    session.succeed(result)
                }
                Err(err) => {
                    tracing::error!("Generation failed: {}", err);
                    session.fail(GENERATION_FAILED_MESSAGE)?;
                    Err(IdeaForgeError::Generation(err))
                }
            }
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(join_err) => {
                tracing::error!("Generation task aborted: {}", join_err);
                let mut session = self.session.lock().await;
                if session.is_generating() {
                    session.fail(GENERATION_FAILED_MESSAGE)?;
                }
                Err(IdeaForgeError::Internal {
                    message: join_err.to_string(),
                })
            }
        }
    }

    /// Back to the input view, dropping the result and any error
    pub async fn reset(&self) -> Result<()> {
        self.session.lock().await.reset()
    }

    pub async fn view_state(&self) -> ViewState {
        self.session.lock().await.view_state()
    }

    /// File for the result on screen, if any
    pub async fn download(&self) -> Option<Download> {
        self.session
            .lock()
            .await
            .displayed()
            .map(|displayed| displayed.download())
    }

    /// Read the session under the lock, e.g. to render a view
    pub async fn with_session<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        let session = self.session.lock().await;
        f(&session)
    }
}
