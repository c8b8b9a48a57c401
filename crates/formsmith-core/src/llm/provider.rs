//! LlmProvider trait definition.
//!
//! This is the abstraction the engine calls through. Uses native async fn in
//! traits (RPITIT, Rust 2024 edition).

use formsmith_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM provider backends.
///
/// The engine makes exactly one non-streaming completion call per
/// generate/refine invocation; providers classify every failure into
/// [`LlmError`] rather than swallowing it, because classification is the
/// orchestrator's fallback trigger.
///
/// Implementations live in formsmith-infra (e.g., `OpenRouterProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openrouter").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
