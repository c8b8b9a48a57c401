//! Version-ledger repository trait definition.

use formsmith_types::bundle::FormBundle;
use formsmith_types::error::RepositoryError;
use formsmith_types::form::{FormId, FormVersion};

/// Repository trait for the append-only version ledger.
///
/// Entries are created by successful generate/refine calls and never mutated
/// or deleted. Implementations must assign strictly increasing, gap-free
/// sequence numbers per form, starting at 1.
pub trait VersionRepository: Send + Sync {
    /// Append a new ledger entry for the form, tagged with the instruction
    /// that produced it. Returns the created entry including its assigned
    /// sequence number.
    fn append(
        &self,
        form_id: &FormId,
        bundle: &FormBundle,
        change_prompt: &str,
    ) -> impl std::future::Future<Output = Result<FormVersion, RepositoryError>> + Send;

    /// List all ledger entries for a form, newest first.
    fn list(
        &self,
        form_id: &FormId,
    ) -> impl std::future::Future<Output = Result<Vec<FormVersion>, RepositoryError>> + Send;
}
