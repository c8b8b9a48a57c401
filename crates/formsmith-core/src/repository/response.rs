//! Form-response repository trait definition.

use formsmith_types::error::RepositoryError;
use formsmith_types::form::{FormId, FormResponse};

/// Repository trait for submitted form responses.
pub trait ResponseRepository: Send + Sync {
    /// Persist a submitted response.
    fn create(
        &self,
        response: &FormResponse,
    ) -> impl std::future::Future<Output = Result<FormResponse, RepositoryError>> + Send;

    /// List all responses for a form, newest first.
    fn list(
        &self,
        form_id: &FormId,
    ) -> impl std::future::Future<Output = Result<Vec<FormResponse>, RepositoryError>> + Send;
}
