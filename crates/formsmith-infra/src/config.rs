//! Global configuration loader for Formsmith.
//!
//! Reads `config.toml` from the data directory (`~/.formsmith/` in
//! production) and deserializes it into [`GlobalConfig`]. Falls back to
//! sensible defaults when the file is missing or malformed. The OpenRouter
//! API key comes from the `OPENROUTER_API_KEY` environment variable, never
//! from the config file.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use formsmith_types::config::GlobalConfig;

/// Resolve the data directory: `FORMSMITH_DATA_DIR` if set, otherwise
/// `~/.formsmith`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FORMSMITH_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".formsmith")
}

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the
///   default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Read the OpenRouter API key from the environment.
///
/// A missing key is not fatal: the provider will receive an empty key, the
/// API will answer 401, and generation falls back to the heuristic path --
/// the same degraded-but-available behavior as an invalid key.
pub fn api_key_from_env() -> SecretString {
    match std::env::var("OPENROUTER_API_KEY") {
        Ok(key) if !key.trim().is_empty() => SecretString::from(key),
        _ => {
            tracing::warn!(
                "OPENROUTER_API_KEY is not set; generation will use the heuristic fallback"
            );
            SecretString::from("")
        }
    }
}
