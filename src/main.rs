use anyhow::Result;
use idea_forge::{build_state, config::Config, http::start_http_server};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration using the typed config system
    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(config.runtime.log_level.as_str())
        .init();

    for notice in &config.runtime.notices {
        warn!("{}", notice);
    }

    info!(
        "Configuration loaded: model={}, api_base={}, bind={}",
        config.generation.model, config.generation.api_base, config.server.bind
    );

    if config.runtime.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; every generation will fail");
    }

    let state = build_state(config)?;
    start_http_server(state).await?;

    Ok(())
}
