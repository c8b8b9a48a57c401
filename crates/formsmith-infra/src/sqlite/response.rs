//! SQLite form-response repository implementation.

use sqlx::Row;

use formsmith_core::repository::response::ResponseRepository;
use formsmith_types::error::RepositoryError;
use formsmith_types::form::{FormId, FormResponse, ResponseId};

use super::form::{format_datetime, parse_datetime};
use super::pool::DatabasePool;

/// SQLite-backed implementation of `ResponseRepository`.
pub struct SqliteResponseRepository {
    pool: DatabasePool,
}

impl SqliteResponseRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_response(row: &sqlx::sqlite::SqliteRow) -> Result<FormResponse, RepositoryError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let form_id: String = row
        .try_get("form_id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let data: String = row
        .try_get("data")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    Ok(FormResponse {
        id: id
            .parse::<ResponseId>()
            .map_err(|e| RepositoryError::Query(format!("invalid response id: {e}")))?,
        form_id: form_id
            .parse::<FormId>()
            .map_err(|e| RepositoryError::Query(format!("invalid form id: {e}")))?,
        data: serde_json::from_str(&data)
            .map_err(|e| RepositoryError::Query(format!("invalid response JSON: {e}")))?,
        created_at: parse_datetime(&created_at)?,
    })
}

impl ResponseRepository for SqliteResponseRepository {
    async fn create(&self, response: &FormResponse) -> Result<FormResponse, RepositoryError> {
        let data_json = serde_json::to_string(&response.data)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            "INSERT INTO form_responses (id, form_id, data, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(response.id.to_string())
        .bind(response.form_id.to_string())
        .bind(&data_json)
        .bind(format_datetime(&response.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(response.clone())
    }

    async fn list(&self, form_id: &FormId) -> Result<Vec<FormResponse>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM form_responses WHERE form_id = ? ORDER BY created_at DESC",
        )
        .bind(form_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(row_to_response).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::form::tests::{sample_form, test_pool};
    use crate::sqlite::form::SqliteFormRepository;
    use chrono::Utc;
    use formsmith_core::repository::form::FormRepository;

    #[tokio::test]
    async fn test_create_and_list_responses() {
        let (_dir, pool) = test_pool().await;
        let forms = SqliteFormRepository::new(pool.clone());
        let repo = SqliteResponseRepository::new(pool);

        let form = sample_form("owner-1");
        forms.create(&form).await.unwrap();

        let response = FormResponse {
            id: ResponseId::new(),
            form_id: form.id.clone(),
            data: serde_json::json!({"name": "Ada", "email": "ada@example.com"}),
            created_at: Utc::now(),
        };
        repo.create(&response).await.unwrap();

        let listed = repo.list(&form.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].data["name"], "Ada");
    }

    #[tokio::test]
    async fn test_response_counts_show_in_form_listing() {
        let (_dir, pool) = test_pool().await;
        let forms = SqliteFormRepository::new(pool.clone());
        let repo = SqliteResponseRepository::new(pool);

        let form = sample_form("owner-1");
        forms.create(&form).await.unwrap();

        for i in 0..3 {
            repo.create(&FormResponse {
                id: ResponseId::new(),
                form_id: form.id.clone(),
                data: serde_json::json!({ "n": i }),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        }

        let entries = forms.list_by_owner("owner-1").await.unwrap();
        assert_eq!(entries[0].response_count, 3);
    }
}
