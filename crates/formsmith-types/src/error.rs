use thiserror::Error;

use crate::llm::LlmError;

/// Errors related to form operations.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("form not found")]
    NotFound,

    #[error("invalid prompt: {0}")]
    InvalidPrompt(String),

    #[error("invalid title: {0}")]
    InvalidTitle(String),

    /// The refinement engine could not reach the model service. Initial
    /// generation never surfaces this -- it falls back to the heuristic
    /// generator instead.
    #[error("refinement unavailable: {0}")]
    RefinementUnavailable(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Failure to recover a bundle from raw model text.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no well-formed bundle found in model output")]
    Malformed,
}

/// Errors from the generation/refinement orchestrator.
///
/// `generate` is total and never returns this; only `refine` can fail, and
/// only on transport/auth-classified provider failures. Parse failures are
/// absorbed as a no-op refinement.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("refinement unavailable: {source}")]
    RefinementUnavailable {
        #[source]
        source: LlmError,
    },
}

/// Errors from repository operations (used by trait definitions in
/// formsmith-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_error_display() {
        let err = FormError::InvalidPrompt("prompt cannot be empty".to_string());
        assert_eq!(err.to_string(), "invalid prompt: prompt cannot be empty");
    }

    #[test]
    fn test_engine_error_carries_classification() {
        let err = EngineError::RefinementUnavailable {
            source: LlmError::Unauthorized,
        };
        assert!(err.to_string().contains("authentication failed"));
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
