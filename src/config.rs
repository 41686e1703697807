use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{IdeaForgeError, Result};
use crate::prompts::SYSTEM_INSTRUCTION;

const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT_MS: u64 = 120_000;
const MIN_TIMEOUT_MS: u64 = 1_000;
const MAX_TIMEOUT_MS: u64 = 600_000;
const DEFAULT_BIND: ([u8; 4], u16) = ([127, 0, 0, 1], 8787);
const DEFAULT_LOG_LEVEL: &str = "idea_forge=info,tower_http=info";

/// Main configuration loaded from idea_forge.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub server: ServerConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Settings for the outbound generation call
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub model: String,
    pub api_base: String,
    pub system_instruction: String,
    pub timeout_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl GenerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(DEFAULT_BIND),
        }
    }
}

/// Secrets and process-level settings, never read from the TOML file
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub gemini_api_key: Option<String>,
    pub log_level: String,
    /// Warnings raised while loading, logged once tracing is up
    pub notices: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            notices: Vec::new(),
        }
    }
}

impl RuntimeConfig {
    /// Load runtime configuration from environment variables
    pub fn load_from_env() -> Self {
        Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
            notices: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses IDEA_FORGE_CONFIG environment variable or defaults to "idea_forge.toml"
    pub fn load() -> Result<Self> {
        if let Ok(env_path) = std::env::var("IDEA_FORGE_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::dotenv();
        }

        let config_path = std::env::var("IDEA_FORGE_CONFIG")
            .unwrap_or_else(|_| "idea_forge.toml".to_string());

        let (mut config, missing) = match std::fs::read_to_string(&config_path) {
            Ok(content) => (Self::from_toml_str(&content)?, false),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => (Self::default(), true),
            Err(e) => {
                return Err(IdeaForgeError::Config {
                    message: format!("Failed to read config file {}: {}", config_path, e),
                });
            }
        };

        config.apply_env_overrides();
        config.runtime = RuntimeConfig::load_from_env();
        if missing {
            config
                .runtime
                .notices
                .push(format!("Config file {} not found, using defaults", config_path));
        }
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Environment wins over the file (env-first)
    fn apply_env_overrides(&mut self) {
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            self.generation.model = model;
        }
        if let Ok(base) = std::env::var("GEMINI_API_BASE") {
            self.generation.api_base = base;
        }
        if let Some(timeout) = std::env::var("GEMINI_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.generation.timeout_ms = timeout;
        }
        if let Ok(v) = std::env::var("IDEA_FORGE_HTTP_BIND")
            && let Ok(bind) = v.parse::<SocketAddr>()
        {
            self.server.bind = bind;
        }
    }

    /// Validate and clamp; rejects values the client cannot work with
    pub fn validate(&mut self) -> Result<()> {
        if self.generation.model.trim().is_empty() {
            return Err(IdeaForgeError::Config {
                message: "generation.model must not be empty".to_string(),
            });
        }
        if !self.generation.api_base.starts_with("http://")
            && !self.generation.api_base.starts_with("https://")
        {
            return Err(IdeaForgeError::Config {
                message: format!(
                    "generation.api_base '{}' must start with http:// or https://",
                    self.generation.api_base
                ),
            });
        }
        let clamped = self
            .generation
            .timeout_ms
            .clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS);
        if clamped != self.generation.timeout_ms {
            self.runtime.notices.push(format!(
                "generation.timeout_ms {} out of range, clamping to {}",
                self.generation.timeout_ms, clamped
            ));
            self.generation.timeout_ms = clamped;
        }
        Ok(())
    }
}
