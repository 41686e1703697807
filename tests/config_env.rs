use std::io::Write;

use idea_forge::config::Config;
use idea_forge::error::IdeaForgeError;

// Single test in this binary: it mutates process environment.
#[test]
fn file_then_env_overrides_then_clamping() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[generation]
model = "file-model"
api_base = "https://file.example"
timeout_ms = 30000

[server]
bind = "0.0.0.0:9000"
"#
    )
    .unwrap();

    unsafe {
        std::env::set_var("IDEA_FORGE_ENV_FILE", "/nonexistent/idea-forge.env");
        std::env::set_var("IDEA_FORGE_CONFIG", file.path());
        std::env::set_var("GEMINI_MODEL", "env-model");
        std::env::set_var("GEMINI_TIMEOUT_MS", "5");
        std::env::set_var("GEMINI_API_KEY", "  key-from-env  ");
        std::env::remove_var("GEMINI_API_BASE");
        std::env::remove_var("IDEA_FORGE_HTTP_BIND");
    }

    let config = Config::load().unwrap();
    assert_eq!(config.generation.model, "env-model");
    assert_eq!(config.generation.api_base, "https://file.example");
    assert_eq!(config.generation.timeout_ms, 1_000);
    assert_eq!(config.server.bind.to_string(), "0.0.0.0:9000");
    assert!(config.runtime.gemini_api_key.is_some());
    assert_eq!(
        config.runtime.notices,
        vec!["generation.timeout_ms 5 out of range, clamping to 1000".to_string()]
    );

    unsafe {
        std::env::set_var("GEMINI_API_BASE", "ftp://nope");
    }
    assert!(matches!(Config::load(), Err(IdeaForgeError::Config { .. })));

    // A directory exists but cannot be read as a file
    let dir = tempfile::tempdir().unwrap();
    unsafe {
        std::env::remove_var("GEMINI_API_BASE");
        std::env::set_var("IDEA_FORGE_CONFIG", dir.path());
    }
    let err = Config::load().unwrap_err();
    assert!(matches!(err, IdeaForgeError::Config { ref message } if message.starts_with("Failed to read config file")));

    unsafe {
        std::env::set_var("IDEA_FORGE_CONFIG", "/nonexistent/idea_forge.toml");
        std::env::remove_var("GEMINI_MODEL");
        std::env::remove_var("GEMINI_TIMEOUT_MS");
        std::env::set_var("IDEA_FORGE_HTTP_BIND", "127.0.0.1:9999");
    }
    let defaults = Config::load().unwrap();
    assert_eq!(defaults.generation.model, "gemini-3-flash-preview");
    assert_eq!(defaults.generation.timeout_ms, 120_000);
    assert_eq!(defaults.server.bind.to_string(), "127.0.0.1:9999");
    assert_eq!(
        defaults.runtime.notices,
        vec!["Config file /nonexistent/idea_forge.toml not found, using defaults".to_string()]
    );
}
