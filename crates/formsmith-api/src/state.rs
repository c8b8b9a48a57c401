//! Application state wiring all services together.
//!
//! AppState holds the concrete service instance used by both CLI and REST
//! API. The form service is generic over repository and provider traits, but
//! AppState pins it to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use formsmith_core::engine::SchemaEngine;
use formsmith_core::service::form::FormService;
use formsmith_infra::config::{api_key_from_env, load_global_config, resolve_data_dir};
use formsmith_infra::llm::openrouter::OpenRouterProvider;
use formsmith_infra::sqlite::form::SqliteFormRepository;
use formsmith_infra::sqlite::pool::DatabasePool;
use formsmith_infra::sqlite::response::SqliteResponseRepository;
use formsmith_infra::sqlite::version::SqliteVersionRepository;

/// Concrete type alias for the form service pinned to infra implementations.
pub type ConcreteFormService = FormService<
    SqliteFormRepository,
    SqliteVersionRepository,
    SqliteResponseRepository,
    OpenRouterProvider,
>;

/// Shared application state.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub form_service: Arc<ConcreteFormService>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        // Initialize database
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("formsmith.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        // Load config and wire the LLM provider
        let config = load_global_config(&data_dir).await;
        let provider = OpenRouterProvider::new(
            api_key_from_env(),
            config.model.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
        .with_base_url(config.base_url.clone());

        let engine = SchemaEngine::new(provider, config.model);

        let form_service = FormService::new(
            SqliteFormRepository::new(db_pool.clone()),
            SqliteVersionRepository::new(db_pool.clone()),
            SqliteResponseRepository::new(db_pool.clone()),
            engine,
        );

        Ok(Self {
            form_service: Arc::new(form_service),
            data_dir,
            db_pool,
        })
    }
}
