//! SQLite form repository implementation.
//!
//! Implements `FormRepository` from `formsmith-core` using sqlx with split
//! read/write pools. The current bundle is stored as a JSON text column.

use chrono::{DateTime, Utc};
use sqlx::Row;

use formsmith_core::repository::form::FormRepository;
use formsmith_types::bundle::FormBundle;
use formsmith_types::error::RepositoryError;
use formsmith_types::form::{Form, FormId, FormListEntry};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `FormRepository`.
pub struct SqliteFormRepository {
    pool: DatabasePool,
}

impl SqliteFormRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to a domain Form.
struct FormRow {
    id: String,
    owner_id: String,
    title: String,
    bundle: String,
    version: i64,
    created_at: String,
    updated_at: String,
}

impl FormRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            title: row.try_get("title")?,
            bundle: row.try_get("bundle")?,
            version: row.try_get("version")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_form(self) -> Result<Form, RepositoryError> {
        let id = self
            .id
            .parse::<FormId>()
            .map_err(|e| RepositoryError::Query(format!("invalid form id: {e}")))?;

        let bundle: FormBundle = serde_json::from_str(&self.bundle)
            .map_err(|e| RepositoryError::Query(format!("invalid bundle JSON: {e}")))?;

        Ok(Form {
            id,
            owner_id: self.owner_id,
            title: self.title,
            bundle,
            version: self.version,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub(crate) fn bundle_json(bundle: &FormBundle) -> Result<String, RepositoryError> {
    serde_json::to_string(bundle).map_err(|e| RepositoryError::Query(e.to_string()))
}

impl FormRepository for SqliteFormRepository {
    async fn create(&self, form: &Form) -> Result<Form, RepositoryError> {
        sqlx::query(
            "INSERT INTO forms (id, owner_id, title, bundle, version, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(form.id.to_string())
        .bind(&form.owner_id)
        .bind(&form.title)
        .bind(bundle_json(&form.bundle)?)
        .bind(form.version)
        .bind(format_datetime(&form.created_at))
        .bind(format_datetime(&form.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(form.clone())
    }

    async fn get_by_id(&self, id: &FormId) -> Result<Option<Form>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM forms WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let form_row =
                    FormRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(form_row.into_form()?))
            }
            None => Ok(None),
        }
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<FormListEntry>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT f.*, COUNT(r.id) AS response_count
             FROM forms f
             LEFT JOIN form_responses r ON r.form_id = f.id
             WHERE f.owner_id = ?
             GROUP BY f.id
             ORDER BY f.created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let response_count: i64 = row
                    .try_get("response_count")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                let form_row =
                    FormRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(FormListEntry {
                    form: form_row.into_form()?,
                    response_count,
                })
            })
            .collect()
    }

    async fn update(&self, form: &Form) -> Result<Form, RepositoryError> {
        let result = sqlx::query(
            "UPDATE forms SET title = ?, bundle = ?, version = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&form.title)
        .bind(bundle_json(&form.bundle)?)
        .bind(form.version)
        .bind(format_datetime(&form.updated_at))
        .bind(form.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(form.clone())
    }

    async fn delete(&self, id: &FormId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM forms WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) async fn test_pool() -> (tempfile::TempDir, DatabasePool) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (dir, pool)
    }

    pub(crate) fn sample_form(owner_id: &str) -> Form {
        let now = Utc::now();
        Form {
            id: FormId::new(),
            owner_id: owner_id.to_string(),
            title: "Contact".to_string(),
            bundle: FormBundle::empty(),
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_roundtrip() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteFormRepository::new(pool);
        let form = sample_form("owner-1");

        repo.create(&form).await.unwrap();
        let loaded = repo.get_by_id(&form.id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "Contact");
        assert_eq!(loaded.owner_id, "owner-1");
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.bundle, form.bundle);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteFormRepository::new(pool);
        assert!(repo.get_by_id(&FormId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_owner_filters_and_orders() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteFormRepository::new(pool);

        let mine = sample_form("owner-1");
        let theirs = sample_form("owner-2");
        repo.create(&mine).await.unwrap();
        repo.create(&theirs).await.unwrap();

        let entries = repo.list_by_owner("owner-1").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].form.id, mine.id);
        assert_eq!(entries[0].response_count, 0);
    }

    #[tokio::test]
    async fn test_update_bumps_fields() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteFormRepository::new(pool);
        let mut form = sample_form("owner-1");
        repo.create(&form).await.unwrap();

        form.title = "Signup".to_string();
        form.version = 2;
        repo.update(&form).await.unwrap();

        let loaded = repo.get_by_id(&form.id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "Signup");
        assert_eq!(loaded.version, 2);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteFormRepository::new(pool);
        let err = repo.delete(&FormId::new()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
