//! Form lifecycle service.
//!
//! Orchestrates the engine and the persistence ports: generation creates a
//! form at version 1 plus its initial ledger entry; refinement bumps the
//! version counter and appends to the ledger. The engine itself never
//! persists anything -- persistence ordering lives here.

use chrono::Utc;

use formsmith_types::bundle::FormBundle;
use formsmith_types::error::{EngineError, FormError, RepositoryError};
use formsmith_types::form::{
    Form, FormId, FormListEntry, FormResponse, FormVersion, ResponseId,
};

use crate::engine::SchemaEngine;
use crate::llm::provider::LlmProvider;
use crate::repository::form::FormRepository;
use crate::repository::response::ResponseRepository;
use crate::repository::version::VersionRepository;

/// Service orchestrating the full form lifecycle.
///
/// Generic over repository and provider traits to maintain clean
/// architecture -- formsmith-core never depends on formsmith-infra.
pub struct FormService<F, V, R, P>
where
    F: FormRepository,
    V: VersionRepository,
    R: ResponseRepository,
    P: LlmProvider,
{
    form_repo: F,
    version_repo: V,
    response_repo: R,
    engine: SchemaEngine<P>,
}

impl<F, V, R, P> FormService<F, V, R, P>
where
    F: FormRepository,
    V: VersionRepository,
    R: ResponseRepository,
    P: LlmProvider,
{
    pub fn new(form_repo: F, version_repo: V, response_repo: R, engine: SchemaEngine<P>) -> Self {
        Self {
            form_repo,
            version_repo,
            response_repo,
            engine,
        }
    }

    /// Generate a new form from a natural-language prompt.
    ///
    /// Creates the form at version 1 and appends the initial ledger entry
    /// tagged with the prompt. Returns the form and its follow-up questions.
    pub async fn generate_form(
        &self,
        owner_id: &str,
        title: Option<String>,
        prompt: &str,
    ) -> Result<(Form, Vec<String>), FormError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(FormError::InvalidPrompt("prompt cannot be empty".to_string()));
        }

        let bundle = self.engine.generate(prompt).await;
        let followups = bundle.followups.clone();
        let now = Utc::now();

        let form = Form {
            id: FormId::new(),
            owner_id: owner_id.to_string(),
            title: title.unwrap_or_else(|| "Untitled Form".to_string()),
            bundle,
            version: 1,
            created_at: now,
            updated_at: now,
        };

        let form = self
            .form_repo
            .create(&form)
            .await
            .map_err(storage_error)?;

        self.version_repo
            .append(&form.id, &form.bundle, prompt)
            .await
            .map_err(storage_error)?;

        tracing::info!(form_id = %form.id, fields = form.bundle.schema.properties.len(), "form generated");
        Ok((form, followups))
    }

    /// Refine an existing form with a natural-language instruction.
    ///
    /// A no-op refinement (unparseable model output) still bumps the version
    /// counter and appends a ledger entry carrying the instruction, so the
    /// history records that the edit was attempted. Provider failures
    /// surface as [`FormError::RefinementUnavailable`] and leave the form
    /// untouched.
    pub async fn refine_form(
        &self,
        owner_id: &str,
        id: &FormId,
        instruction: &str,
    ) -> Result<(Form, Vec<String>), FormError> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(FormError::InvalidPrompt(
                "instruction cannot be empty".to_string(),
            ));
        }

        let mut form = self.owned_form(owner_id, id).await?;

        let refined = self
            .engine
            .refine(&form.bundle, instruction)
            .await
            .map_err(|e| match e {
                EngineError::RefinementUnavailable { source } => {
                    FormError::RefinementUnavailable(source.to_string())
                }
            })?;

        let followups = refined.followups.clone();
        form.bundle = refined;
        form.version += 1;
        form.updated_at = Utc::now();

        let form = self
            .form_repo
            .update(&form)
            .await
            .map_err(storage_error)?;

        self.version_repo
            .append(&form.id, &form.bundle, instruction)
            .await
            .map_err(storage_error)?;

        tracing::info!(form_id = %form.id, version = form.version, "form refined");
        Ok((form, followups))
    }

    /// Get a form by ID along with its full version ledger, newest first.
    ///
    /// Public: forms are shareable for rendering.
    pub async fn get_form(&self, id: &FormId) -> Result<(Form, Vec<FormVersion>), FormError> {
        let form = self
            .form_repo
            .get_by_id(id)
            .await
            .map_err(storage_error)?
            .ok_or(FormError::NotFound)?;

        let versions = self.version_repo.list(id).await.map_err(storage_error)?;
        Ok((form, versions))
    }

    /// List a user's forms, newest first, with response counts.
    pub async fn list_forms(&self, owner_id: &str) -> Result<Vec<FormListEntry>, FormError> {
        self.form_repo
            .list_by_owner(owner_id)
            .await
            .map_err(storage_error)
    }

    /// Rename a form. Title changes do not touch the version ledger.
    pub async fn update_title(
        &self,
        owner_id: &str,
        id: &FormId,
        title: &str,
    ) -> Result<Form, FormError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(FormError::InvalidTitle("title cannot be empty".to_string()));
        }

        let mut form = self.owned_form(owner_id, id).await?;
        form.title = title.to_string();
        form.updated_at = Utc::now();

        self.form_repo.update(&form).await.map_err(storage_error)
    }

    /// Delete a form, cascading its versions and responses.
    pub async fn delete_form(&self, owner_id: &str, id: &FormId) -> Result<(), FormError> {
        let form = self.owned_form(owner_id, id).await?;
        self.form_repo.delete(&form.id).await.map_err(storage_error)
    }

    /// Store a submitted response. Public: anyone with the form link can
    /// submit. The data is stored as-is; the engine does not interpret it.
    pub async fn submit_response(
        &self,
        form_id: &FormId,
        data: serde_json::Value,
    ) -> Result<FormResponse, FormError> {
        // The form must exist; submissions to deleted forms are rejected.
        self.form_repo
            .get_by_id(form_id)
            .await
            .map_err(storage_error)?
            .ok_or(FormError::NotFound)?;

        let response = FormResponse {
            id: ResponseId::new(),
            form_id: form_id.clone(),
            data,
            created_at: Utc::now(),
        };

        self.response_repo
            .create(&response)
            .await
            .map_err(storage_error)
    }

    /// List responses for a form the caller owns, newest first.
    pub async fn list_responses(
        &self,
        owner_id: &str,
        form_id: &FormId,
    ) -> Result<Vec<FormResponse>, FormError> {
        self.owned_form(owner_id, form_id).await?;
        self.response_repo.list(form_id).await.map_err(storage_error)
    }

    /// The current bundle of a form, without the ledger.
    pub async fn current_bundle(&self, id: &FormId) -> Result<FormBundle, FormError> {
        let form = self
            .form_repo
            .get_by_id(id)
            .await
            .map_err(storage_error)?
            .ok_or(FormError::NotFound)?;
        Ok(form.bundle)
    }

    /// Load a form and verify ownership. A form owned by someone else is
    /// indistinguishable from a missing one, matching the route contract.
    async fn owned_form(&self, owner_id: &str, id: &FormId) -> Result<Form, FormError> {
        let form = self
            .form_repo
            .get_by_id(id)
            .await
            .map_err(storage_error)?
            .ok_or(FormError::NotFound)?;

        if form.owner_id != owner_id {
            return Err(FormError::NotFound);
        }
        Ok(form)
    }
}

fn storage_error(e: RepositoryError) -> FormError {
    FormError::StorageError(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use formsmith_types::form::VersionId;
    use formsmith_types::llm::{CompletionRequest, CompletionResponse, LlmError};

    /// In-memory repositories for service-level tests.
    #[derive(Default)]
    struct MemForms(Mutex<HashMap<String, Form>>);

    impl FormRepository for MemForms {
        async fn create(&self, form: &Form) -> Result<Form, RepositoryError> {
            self.0
                .lock()
                .unwrap()
                .insert(form.id.to_string(), form.clone());
            Ok(form.clone())
        }

        async fn get_by_id(&self, id: &FormId) -> Result<Option<Form>, RepositoryError> {
            Ok(self.0.lock().unwrap().get(&id.to_string()).cloned())
        }

        async fn list_by_owner(
            &self,
            owner_id: &str,
        ) -> Result<Vec<FormListEntry>, RepositoryError> {
            let mut entries: Vec<FormListEntry> = self
                .0
                .lock()
                .unwrap()
                .values()
                .filter(|f| f.owner_id == owner_id)
                .map(|f| FormListEntry {
                    form: f.clone(),
                    response_count: 0,
                })
                .collect();
            entries.sort_by(|a, b| b.form.created_at.cmp(&a.form.created_at));
            Ok(entries)
        }

        async fn update(&self, form: &Form) -> Result<Form, RepositoryError> {
            self.0
                .lock()
                .unwrap()
                .insert(form.id.to_string(), form.clone());
            Ok(form.clone())
        }

        async fn delete(&self, id: &FormId) -> Result<(), RepositoryError> {
            self.0.lock().unwrap().remove(&id.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemVersions(Mutex<Vec<FormVersion>>);

    impl VersionRepository for MemVersions {
        async fn append(
            &self,
            form_id: &FormId,
            bundle: &FormBundle,
            change_prompt: &str,
        ) -> Result<FormVersion, RepositoryError> {
            let mut versions = self.0.lock().unwrap();
            let seq = versions
                .iter()
                .filter(|v| &v.form_id == form_id)
                .map(|v| v.seq)
                .max()
                .unwrap_or(0)
                + 1;
            let version = FormVersion {
                id: VersionId::new(),
                form_id: form_id.clone(),
                seq,
                bundle: bundle.clone(),
                change_prompt: change_prompt.to_string(),
                created_at: Utc::now(),
            };
            versions.push(version.clone());
            Ok(version)
        }

        async fn list(&self, form_id: &FormId) -> Result<Vec<FormVersion>, RepositoryError> {
            let mut versions: Vec<FormVersion> = self
                .0
                .lock()
                .unwrap()
                .iter()
                .filter(|v| &v.form_id == form_id)
                .cloned()
                .collect();
            versions.sort_by(|a, b| b.seq.cmp(&a.seq));
            Ok(versions)
        }
    }

    #[derive(Default)]
    struct MemResponses(Mutex<Vec<FormResponse>>);

    impl ResponseRepository for MemResponses {
        async fn create(&self, response: &FormResponse) -> Result<FormResponse, RepositoryError> {
            self.0.lock().unwrap().push(response.clone());
            Ok(response.clone())
        }

        async fn list(&self, form_id: &FormId) -> Result<Vec<FormResponse>, RepositoryError> {
            Ok(self
                .0
                .lock()
                .unwrap()
                .iter()
                .filter(|r| &r.form_id == form_id)
                .cloned()
                .collect())
        }
    }

    /// Provider that always fails with a network error, forcing the
    /// heuristic path for generation.
    struct DownProvider;

    impl LlmProvider for DownProvider {
        fn name(&self) -> &str {
            "down"
        }

        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            Err(LlmError::NetworkUnreachable("connection refused".to_string()))
        }
    }

    fn service() -> FormService<MemForms, MemVersions, MemResponses, DownProvider> {
        FormService::new(
            MemForms::default(),
            MemVersions::default(),
            MemResponses::default(),
            SchemaEngine::new(DownProvider, "test/model"),
        )
    }

    #[tokio::test]
    async fn test_generate_creates_version_one() {
        let svc = service();
        let (form, followups) = svc
            .generate_form("owner-1", None, "name and email form")
            .await
            .unwrap();
        assert_eq!(form.version, 1);
        assert_eq!(form.title, "Untitled Form");
        assert_eq!(followups.len(), 1);

        let (_, versions) = svc.get_form(&form.id).await.unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].seq, 1);
        assert_eq!(versions[0].change_prompt, "name and email form");
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_prompt() {
        let svc = service();
        let err = svc.generate_form("owner-1", None, "   ").await.unwrap_err();
        assert!(matches!(err, FormError::InvalidPrompt(_)));
    }

    #[tokio::test]
    async fn test_refine_with_provider_down_leaves_form_untouched() {
        let svc = service();
        let (form, _) = svc
            .generate_form("owner-1", Some("Contact".to_string()), "name and email")
            .await
            .unwrap();

        let err = svc
            .refine_form("owner-1", &form.id, "add a phone field")
            .await
            .unwrap_err();
        assert!(matches!(err, FormError::RefinementUnavailable(_)));

        let (reloaded, versions) = svc.get_form(&form.id).await.unwrap();
        assert_eq!(reloaded.version, 1);
        assert_eq!(versions.len(), 1);
    }

    #[tokio::test]
    async fn test_ownership_is_indistinguishable_from_missing() {
        let svc = service();
        let (form, _) = svc
            .generate_form("owner-1", None, "name")
            .await
            .unwrap();

        let err = svc
            .refine_form("owner-2", &form.id, "add email")
            .await
            .unwrap_err();
        assert!(matches!(err, FormError::NotFound));
    }

    #[tokio::test]
    async fn test_submit_and_list_responses() {
        let svc = service();
        let (form, _) = svc.generate_form("owner-1", None, "email").await.unwrap();

        svc.submit_response(&form.id, serde_json::json!({"email": "a@b.c"}))
            .await
            .unwrap();
        svc.submit_response(&form.id, serde_json::json!({"email": "d@e.f"}))
            .await
            .unwrap();

        let responses = svc.list_responses("owner-1", &form.id).await.unwrap();
        assert_eq!(responses.len(), 2);

        // Non-owners cannot read responses.
        assert!(svc.list_responses("owner-2", &form.id).await.is_err());
    }

    #[tokio::test]
    async fn test_submit_to_missing_form_fails() {
        let svc = service();
        let err = svc
            .submit_response(&FormId::new(), serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, FormError::NotFound));
    }

    #[tokio::test]
    async fn test_update_title_does_not_touch_ledger() {
        let svc = service();
        let (form, _) = svc.generate_form("owner-1", None, "name").await.unwrap();

        let renamed = svc
            .update_title("owner-1", &form.id, "Signup")
            .await
            .unwrap();
        assert_eq!(renamed.title, "Signup");
        assert_eq!(renamed.version, 1);

        let (_, versions) = svc.get_form(&form.id).await.unwrap();
        assert_eq!(versions.len(), 1);
    }
}
