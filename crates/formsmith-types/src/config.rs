//! Global configuration shape, loaded from `config.toml` in the data
//! directory by formsmith-infra.

use serde::{Deserialize, Serialize};

/// Default OpenRouter model used for generation and refinement.
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3.1:free";

/// Default OpenRouter API base URL.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Global configuration for the model service and engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Model identifier sent with every completion request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenRouter-compatible chat-completions API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds. A timeout classifies as a network
    /// failure and triggers the fallback policy; there are no retries.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GlobalConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: GlobalConfig = serde_json::from_str(r#"{"model":"x/y"}"#).unwrap();
        assert_eq!(config.model, "x/y");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
