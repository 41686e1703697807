use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::clients::traits::{ContentGenerator, GenerationError};
use crate::config::GenerationConfig;
use crate::model::{GenerationRequest, GenerationResult, GroundingMetadata};
use crate::prompts::{self, Augmentation};

const ERROR_BODY_CAP_BYTES: usize = 2 * 1024;

/// Client for the Gemini `generateContent` REST endpoint
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    api_base: String,
    system_instruction: String,
    timeout_ms: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    tools: Vec<Tool>,
    system_instruction: Content<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Serializes as `{"googleSearch": {}}` / `{"urlContext": {}}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum Tool {
    GoogleSearch {},
    UrlContext {},
}

impl From<Augmentation> for Tool {
    fn from(value: Augmentation) -> Self {
        match value {
            Augmentation::Search => Tool::GoogleSearch {},
            Augmentation::UrlContext => Tool::UrlContext {},
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl GeminiClient {
    pub fn new(config: &GenerationConfig, api_key: Option<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build reqwest client with timeout: {e}"))?;
        Ok(Self {
            http,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: config.model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            system_instruction: config.system_instruction.clone(),
            timeout_ms: config.timeout_ms,
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        )
    }

    fn map_transport(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            GenerationError::Transport(err.to_string())
        }
    }
}

/// Classify a non-success response from the service
fn classify_failure(status: u16, body: &str) -> GenerationError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let message = match &parsed {
        Some(env) if !env.error.message.is_empty() => env.error.message.clone(),
        _ => body.chars().take(ERROR_BODY_CAP_BYTES).collect(),
    };
    let quota = status == 429
        || parsed
            .as_ref()
            .is_some_and(|env| env.error.status == "RESOURCE_EXHAUSTED");
    match status {
        _ if quota => GenerationError::Quota { message },
        401 | 403 => GenerationError::Auth { status, message },
        _ => GenerationError::Service { status, message },
    }
}

/// Concatenated non-thought text of the first candidate, plus its grounding
fn into_result(response: GenerateContentResponse) -> GenerationResult {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return GenerationResult::default();
    };
    if let Some(reason) = &candidate.finish_reason {
        tracing::debug!("Gemini finish reason: {}", reason);
    }
    let text = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter(|p| !p.thought)
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default();
    GenerationResult {
        text,
        grounding_metadata: candidate.grounding_metadata,
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;

        let prompt = prompts::build_prompt(request);
        let tools: Vec<Tool> = prompts::augmentations(request)
            .into_iter()
            .map(Tool::from)
            .collect();
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: &prompt }],
            }],
            tools,
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: &self.system_instruction,
                }],
            },
        };

        tracing::debug!(
            "Calling Gemini (model={}, type={}, url_context={}, prompt_chars={})",
            self.model,
            request.output_type,
            request.reference_url().is_some(),
            prompt.len()
        );
        let started = Instant::now();

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(classify_failure(status.as_u16(), &error_text));
        }

        let bytes = response.bytes().await.map_err(|e| self.map_transport(e))?;
        let parsed: GenerateContentResponse = serde_json::from_slice(&bytes)
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
        let result = into_result(parsed);

        tracing::info!(
            "Gemini returned {} chars with {} grounding chunks in {}ms",
            result.text.len(),
            result
                .grounding_metadata
                .as_ref()
                .map_or(0, |g| g.grounding_chunks.len()),
            started.elapsed().as_millis()
        );
        Ok(result)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
