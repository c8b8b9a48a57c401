//! Form repository trait definition.

use formsmith_types::error::RepositoryError;
use formsmith_types::form::{Form, FormId, FormListEntry};

/// Repository trait for form persistence.
///
/// Implementations live in formsmith-infra (e.g., SqliteFormRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait FormRepository: Send + Sync {
    /// Persist a new form. Returns the created form.
    fn create(
        &self,
        form: &Form,
    ) -> impl std::future::Future<Output = Result<Form, RepositoryError>> + Send;

    /// Get a form by its unique ID.
    fn get_by_id(
        &self,
        id: &FormId,
    ) -> impl std::future::Future<Output = Result<Option<Form>, RepositoryError>> + Send;

    /// List a user's forms, newest first, with response counts.
    fn list_by_owner(
        &self,
        owner_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<FormListEntry>, RepositoryError>> + Send;

    /// Update an existing form (current bundle, version counter, title,
    /// updated_at). Returns the updated form.
    fn update(
        &self,
        form: &Form,
    ) -> impl std::future::Future<Output = Result<Form, RepositoryError>> + Send;

    /// Permanently delete a form by ID, cascading versions and responses.
    fn delete(
        &self,
        id: &FormId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
