#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use idea_forge::clients::{ContentGenerator, GenerationError};
use idea_forge::model::{GenerationRequest, GenerationResult, GroundingChunk, GroundingMetadata};
use tokio::sync::Notify;

/// Scripted generator that records every request it receives
pub struct FakeGenerator {
    outcome: Mutex<Option<Result<GenerationResult, GenerationError>>>,
    pub calls: Mutex<Vec<GenerationRequest>>,
    gate: Option<Arc<Notify>>,
}

impl FakeGenerator {
    pub fn succeeding(result: GenerationResult) -> Self {
        Self {
            outcome: Mutex::new(Some(Ok(result))),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn failing(err: GenerationError) -> Self {
        Self {
            outcome: Mutex::new(Some(Err(err))),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Hold every call until the gate is notified
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<GenerationRequest> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ContentGenerator for FakeGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        self.calls.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.outcome
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(GenerationError::Transport("fake exhausted".into())))
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}

pub fn grounded(text: &str) -> GenerationResult {
    GenerationResult {
        text: text.to_string(),
        grounding_metadata: Some(GroundingMetadata {
            grounding_chunks: vec![
                GroundingChunk::web("https://a.example", Some("A")),
                GroundingChunk::web("https://b.example", None),
                GroundingChunk { web: None },
            ],
        }),
    }
}
