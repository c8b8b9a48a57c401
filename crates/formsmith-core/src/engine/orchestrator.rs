//! Generation/refinement orchestrator.
//!
//! This is the engine's public contract and the single place where provider
//! failure classifications map to fallback-or-fail policy:
//!
//! - `generate` never fails to the caller. Any provider or extraction
//!   failure falls back to the heuristic generator.
//! - `refine` fails with [`EngineError::RefinementUnavailable`] on provider
//!   failures of any classification (a keyword generator cannot interpret an
//!   edit against an arbitrary existing schema), but absorbs extraction
//!   failures by returning the current bundle unchanged -- an edit that
//!   cannot be parsed is "no confident change", never a fresh guess.
//!
//! No retries happen here; a failed or timed-out call goes straight to
//! fallback or failure on the first attempt.

use formsmith_types::bundle::FormBundle;
use formsmith_types::error::EngineError;
use formsmith_types::llm::LlmError;

use crate::engine::{extract, heuristic, prompt};
use crate::llm::provider::LlmProvider;

/// The generation/refinement engine, generic over the provider backend.
///
/// Stateless across invocations: each call is an independent
/// request/response exchange, so concurrent calls need no coordination here.
pub struct SchemaEngine<P: LlmProvider> {
    provider: P,
    model: String,
}

impl<P: LlmProvider> SchemaEngine<P> {
    pub fn new(provider: P, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Generate a bundle from a natural-language description.
    ///
    /// Infallible to the caller: initial creation must never block the user.
    pub async fn generate(&self, prompt_text: &str) -> FormBundle {
        let request = prompt::generate_request(&self.model, prompt_text);

        let raw = match self.provider.complete(&request).await {
            Ok(response) => response.content,
            Err(err) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    error = %err,
                    "model call failed, using heuristic generation"
                );
                return heuristic::generate(prompt_text);
            }
        };

        match extract::extract_bundle(&raw) {
            Ok(bundle) => bundle,
            Err(err) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    error = %err,
                    "model output unusable, using heuristic generation"
                );
                heuristic::generate(prompt_text)
            }
        }
    }

    /// Refine an existing bundle with a natural-language instruction.
    ///
    /// Returns the refined bundle, or a deep copy of `current` when the
    /// model's answer cannot be parsed (no-op refinement). Fails only when
    /// the provider itself fails.
    pub async fn refine(
        &self,
        current: &FormBundle,
        instruction: &str,
    ) -> Result<FormBundle, EngineError> {
        let request = prompt::refine_request(&self.model, current, instruction).map_err(|e| {
            EngineError::RefinementUnavailable {
                source: LlmError::Unknown(format!("bundle serialization: {e}")),
            }
        })?;

        let raw = self
            .provider
            .complete(&request)
            .await
            .map_err(|source| {
                tracing::warn!(
                    provider = self.provider.name(),
                    error = %source,
                    "model call failed, refinement unavailable"
                );
                EngineError::RefinementUnavailable { source }
            })?
            .content;

        match extract::extract_bundle(&raw) {
            Ok(bundle) => Ok(bundle),
            Err(_) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    "model output unusable, keeping current bundle unchanged"
                );
                Ok(current.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formsmith_types::llm::{CompletionRequest, CompletionResponse, Usage};

    /// Provider double with a scripted outcome.
    enum Script {
        Reply(String),
        Fail(fn() -> LlmError),
    }

    struct ScriptedProvider(Script);

    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            match &self.0 {
                Script::Reply(content) => Ok(CompletionResponse {
                    content: content.clone(),
                    model: request.model.clone(),
                    usage: Usage::default(),
                }),
                Script::Fail(make) => Err(make()),
            }
        }
    }

    fn engine(script: Script) -> SchemaEngine<ScriptedProvider> {
        SchemaEngine::new(ScriptedProvider(script), "test/model")
    }

    const VALID_REPLY: &str = r#"Sure! ```json
{"schema":{"type":"object","properties":{"topic":{"type":"string","title":"Topic"}}},"uiSchema":{},"required":["topic"],"followups":[]}
```"#;

    #[tokio::test]
    async fn test_generate_uses_model_output() {
        let engine = engine(Script::Reply(VALID_REPLY.to_string()));
        let bundle = engine.generate("survey about a topic").await;
        assert_eq!(bundle.field_names(), vec!["topic"]);
        assert_eq!(bundle.required, vec!["topic"]);
    }

    #[tokio::test]
    async fn test_generate_network_failure_falls_back() {
        let engine = engine(Script::Fail(|| {
            LlmError::NetworkUnreachable("connection refused".to_string())
        }));
        let bundle = engine.generate("Create a form with name and email").await;
        assert_eq!(bundle.field_names(), vec!["name", "email"]);
        assert_eq!(bundle.required, vec!["name", "email"]);
        assert_eq!(bundle.followups.len(), 1);
    }

    #[tokio::test]
    async fn test_generate_rate_limit_falls_back() {
        let engine = engine(Script::Fail(|| LlmError::RateLimited {
            retry_after_ms: None,
        }));
        let bundle = engine.generate("feedback form with rating and comments").await;
        // Heuristic knows message/comment/feedback but not "rating".
        assert_eq!(bundle.field_names(), vec!["message"]);
    }

    #[tokio::test]
    async fn test_generate_unparseable_output_falls_back() {
        let engine = engine(Script::Reply("I'd be happy to help!".to_string()));
        let bundle = engine.generate("something with an email").await;
        assert_eq!(bundle.field_names(), vec!["email"]);
        assert_eq!(bundle.followups.len(), 1);
    }

    #[tokio::test]
    async fn test_generate_never_returns_empty_properties() {
        for script in [
            Script::Reply("no json here".to_string()),
            Script::Fail(|| LlmError::Unknown("boom".to_string())),
        ] {
            let engine = engine(script);
            let bundle = engine.generate("").await;
            assert!(!bundle.schema.properties.is_empty());
        }
    }

    #[tokio::test]
    async fn test_refine_applies_model_output() {
        let engine = engine(Script::Reply(VALID_REPLY.to_string()));
        let current = heuristic::generate("name and email");
        let refined = engine.refine(&current, "replace everything with a topic field").await.unwrap();
        assert_eq!(refined.field_names(), vec!["topic"]);
    }

    #[tokio::test]
    async fn test_refine_unparseable_output_is_noop() {
        let engine = engine(Script::Reply("Sorry, I cannot help with that.".to_string()));
        let current = heuristic::generate("name, email and phone");
        let refined = engine.refine(&current, "add a rating").await.unwrap();
        assert_eq!(refined, current);
    }

    #[tokio::test]
    async fn test_refine_unauthorized_fails_outward() {
        let engine = engine(Script::Fail(|| LlmError::Unauthorized));
        let current = heuristic::generate("name");
        let err = engine.refine(&current, "add email").await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::RefinementUnavailable {
                source: LlmError::Unauthorized
            }
        ));
    }

    #[tokio::test]
    async fn test_refine_network_failure_fails_outward() {
        let engine = engine(Script::Fail(|| {
            LlmError::NetworkUnreachable("timed out".to_string())
        }));
        let current = heuristic::generate("name");
        assert!(engine.refine(&current, "add email").await.is_err());
    }
}
