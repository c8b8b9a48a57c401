//! SQLite version-ledger repository implementation.
//!
//! Appends run on the single-connection writer pool, so the
//! read-max-then-insert sequence assignment is serialized even under
//! concurrent refinements of the same form; the UNIQUE(form_id, seq)
//! constraint backstops the gap-free invariant.

use chrono::Utc;
use sqlx::Row;

use formsmith_core::repository::version::VersionRepository;
use formsmith_types::bundle::FormBundle;
use formsmith_types::error::RepositoryError;
use formsmith_types::form::{FormId, FormVersion, VersionId};

use super::form::{bundle_json, format_datetime, parse_datetime};
use super::pool::DatabasePool;

/// SQLite-backed implementation of `VersionRepository`.
pub struct SqliteVersionRepository {
    pool: DatabasePool,
}

impl SqliteVersionRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_version(row: &sqlx::sqlite::SqliteRow) -> Result<FormVersion, RepositoryError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let form_id: String = row
        .try_get("form_id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let seq: i64 = row
        .try_get("seq")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let bundle: String = row
        .try_get("bundle")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let change_prompt: String = row
        .try_get("change_prompt")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    Ok(FormVersion {
        id: id
            .parse::<VersionId>()
            .map_err(|e| RepositoryError::Query(format!("invalid version id: {e}")))?,
        form_id: form_id
            .parse::<FormId>()
            .map_err(|e| RepositoryError::Query(format!("invalid form id: {e}")))?,
        seq,
        bundle: serde_json::from_str::<FormBundle>(&bundle)
            .map_err(|e| RepositoryError::Query(format!("invalid bundle JSON: {e}")))?,
        change_prompt,
        created_at: parse_datetime(&created_at)?,
    })
}

impl VersionRepository for SqliteVersionRepository {
    async fn append(
        &self,
        form_id: &FormId,
        bundle: &FormBundle,
        change_prompt: &str,
    ) -> Result<FormVersion, RepositoryError> {
        let version = FormVersion {
            id: VersionId::new(),
            form_id: form_id.clone(),
            seq: 0, // assigned by the insert below
            bundle: bundle.clone(),
            change_prompt: change_prompt.to_string(),
            created_at: Utc::now(),
        };

        // Sequence assignment happens inside the INSERT so it is atomic on
        // the single writer connection.
        let row = sqlx::query(
            "INSERT INTO form_versions (id, form_id, seq, bundle, change_prompt, created_at)
             VALUES (?, ?, (SELECT COALESCE(MAX(seq), 0) + 1 FROM form_versions WHERE form_id = ?), ?, ?, ?)
             RETURNING seq",
        )
        .bind(version.id.to_string())
        .bind(form_id.to_string())
        .bind(form_id.to_string())
        .bind(bundle_json(bundle)?)
        .bind(&version.change_prompt)
        .bind(format_datetime(&version.created_at))
        .fetch_one(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let seq: i64 = row
            .try_get("seq")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(FormVersion { seq, ..version })
    }

    async fn list(&self, form_id: &FormId) -> Result<Vec<FormVersion>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM form_versions WHERE form_id = ? ORDER BY seq DESC",
        )
        .bind(form_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(row_to_version).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::form::tests::{sample_form, test_pool};
    use crate::sqlite::form::SqliteFormRepository;
    use formsmith_core::repository::form::FormRepository;

    #[tokio::test]
    async fn test_append_assigns_contiguous_sequences_from_one() {
        let (_dir, pool) = test_pool().await;
        let forms = SqliteFormRepository::new(pool.clone());
        let repo = SqliteVersionRepository::new(pool);

        let form = sample_form("owner-1");
        forms.create(&form).await.unwrap();

        for expected in 1..=4 {
            let v = repo
                .append(&form.id, &form.bundle, &format!("change {expected}"))
                .await
                .unwrap();
            assert_eq!(v.seq, expected);
        }

        let versions = repo.list(&form.id).await.unwrap();
        let seqs: Vec<i64> = versions.iter().map(|v| v.seq).collect();
        assert_eq!(seqs, vec![4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn test_sequences_are_independent_per_form() {
        let (_dir, pool) = test_pool().await;
        let forms = SqliteFormRepository::new(pool.clone());
        let repo = SqliteVersionRepository::new(pool);

        let a = sample_form("owner-1");
        let b = sample_form("owner-1");
        forms.create(&a).await.unwrap();
        forms.create(&b).await.unwrap();

        repo.append(&a.id, &a.bundle, "a1").await.unwrap();
        repo.append(&a.id, &a.bundle, "a2").await.unwrap();
        let b1 = repo.append(&b.id, &b.bundle, "b1").await.unwrap();
        assert_eq!(b1.seq, 1);
    }

    #[tokio::test]
    async fn test_entries_record_the_instruction() {
        let (_dir, pool) = test_pool().await;
        let forms = SqliteFormRepository::new(pool.clone());
        let repo = SqliteVersionRepository::new(pool);

        let form = sample_form("owner-1");
        forms.create(&form).await.unwrap();

        repo.append(&form.id, &form.bundle, "add a phone field")
            .await
            .unwrap();
        let versions = repo.list(&form.id).await.unwrap();
        assert_eq!(versions[0].change_prompt, "add a phone field");
        assert_eq!(versions[0].bundle, form.bundle);
    }

    #[tokio::test]
    async fn test_deleting_form_cascades_ledger() {
        let (_dir, pool) = test_pool().await;
        let forms = SqliteFormRepository::new(pool.clone());
        let repo = SqliteVersionRepository::new(pool);

        let form = sample_form("owner-1");
        forms.create(&form).await.unwrap();
        repo.append(&form.id, &form.bundle, "v1").await.unwrap();

        forms.delete(&form.id).await.unwrap();
        assert!(repo.list(&form.id).await.unwrap().is_empty());
    }
}
