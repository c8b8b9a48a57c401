//! OpenRouterProvider -- concrete [`LlmProvider`] implementation for the
//! OpenRouter chat-completions API.
//!
//! One bounded, non-retried request per call. Transport and authorization
//! failures are classified into [`LlmError`], never swallowed here --
//! classification is the orchestrator's fallback trigger.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

mod types;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use formsmith_core::llm::provider::LlmProvider;
use formsmith_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

use self::types::{ChatMessage, ChatRequest, ChatResponse};

/// Referer/title headers OpenRouter uses for app attribution.
const APP_REFERER: &str = "https://github.com/formsmith/formsmith";
const APP_TITLE: &str = "Formsmith";

/// OpenRouter LLM provider.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing the Authorization header. It never appears in Debug output,
/// Display output, or tracing logs.
pub struct OpenRouterProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl OpenRouterProvider {
    /// Create a new OpenRouter provider.
    ///
    /// `timeout` bounds each completion call; on expiry the call classifies
    /// as [`LlmError::NetworkUnreachable`] and the engine falls back
    /// immediately, with no retries.
    pub fn new(api_key: SecretString, model: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model,
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// The default model for this provider.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Convert the generic request to the OpenRouter wire shape. The system
    /// prompt becomes the leading `system` message.
    fn to_chat_request(&self, request: &CompletionRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        if let Some(ref system) = request.system {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }

        for msg in &request.messages {
            messages.push(ChatMessage {
                role: msg.role.to_string(),
                content: msg.content.clone(),
            });
        }

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        ChatRequest {
            model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

/// Classify a reqwest transport error.
fn classify_transport(err: reqwest::Error) -> LlmError {
    if err.is_timeout() || err.is_connect() {
        LlmError::NetworkUnreachable(err.to_string())
    } else {
        LlmError::Unknown(err.to_string())
    }
}

/// Classify a non-success HTTP status.
fn classify_status(status: reqwest::StatusCode, retry_after_ms: Option<u64>, body: &str) -> LlmError {
    match status.as_u16() {
        401 | 403 => LlmError::Unauthorized,
        429 => LlmError::RateLimited { retry_after_ms },
        code => LlmError::Unknown(format!("HTTP {code}: {}", truncate(body, 200))),
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

impl LlmProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        let chat_request = self.to_chat_request(request);
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .header("HTTP-Referer", APP_REFERER)
            .header("X-Title", APP_TITLE)
            .json(&chat_request)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_ms = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs * 1000);
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, retry_after_ms, &body));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Unknown(format!("response decode: {e}")))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::Unknown("response contained no choices".to_string()))?;

        let usage = body
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        tracing::debug!(
            model = body.model.as_deref().unwrap_or(&chat_request.model),
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "completion received"
        );

        Ok(CompletionResponse {
            content,
            model: body.model.unwrap_or(chat_request.model),
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formsmith_types::llm::Message;

    fn provider() -> OpenRouterProvider {
        OpenRouterProvider::new(
            SecretString::from("test-key"),
            "test/model".to_string(),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_system_prompt_becomes_leading_message() {
        let req = CompletionRequest {
            model: String::new(),
            messages: vec![Message::user("describe a form")],
            system: Some("you are a generator".to_string()),
            max_tokens: 2000,
            temperature: Some(0.7),
        };
        let chat = provider().to_chat_request(&req);
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[0].role, "system");
        assert_eq!(chat.messages[1].role, "user");
        // Empty request model falls back to the configured default.
        assert_eq!(chat.model, "test/model");
    }

    #[test]
    fn test_status_classification() {
        use reqwest::StatusCode;

        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, None, ""),
            LlmError::Unauthorized
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, None, ""),
            LlmError::Unauthorized
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, Some(2000), ""),
            LlmError::RateLimited {
                retry_after_ms: Some(2000)
            }
        ));
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, None, "boom"),
            LlmError::Unknown(_)
        ));
    }

    #[test]
    fn test_base_url_override_trims_trailing_slash() {
        let p = provider().with_base_url("http://localhost:9999/v1/".to_string());
        assert_eq!(p.base_url, "http://localhost:9999/v1");
    }
}
