pub mod clients;
pub mod config;
pub mod error;
pub mod forge;
pub mod http;
pub mod input;
pub mod model;
pub mod pages;
pub mod prompts;
pub mod render;
pub mod session;

use std::sync::Arc;

use crate::clients::GeminiClient;
use crate::config::Config;
use crate::forge::Forge;
use crate::http::HttpState;
use crate::render::FrameRegistry;

/// Wire the Gemini client, the session and the frame registry together
pub fn build_state(config: Config) -> anyhow::Result<HttpState> {
    let client = GeminiClient::new(&config.generation, config.runtime.gemini_api_key.clone())?;
    let has_credential = client.has_credential();
    let frames = FrameRegistry::new();
    let forge = Forge::new(Arc::new(client), frames.clone());
    Ok(HttpState {
        config: Arc::new(config),
        forge,
        frames,
        has_credential,
    })
}
