//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.
//!
//! Form rendering and response submission are public (forms are shared by
//! link); everything that creates, edits, or reads back owner data requires
//! an API key. In production, a built web frontend can be served from disk
//! (configurable via `FORMSMITH_WEB_DIR`). API routes take priority; unknown
//! paths fall through to the frontend's `index.html` for client-side
//! routing. If the directory does not exist, only the API is served.

use axum::Router;
use axum::routing::{delete, get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Form lifecycle
        .route("/forms/generate", post(handlers::form::generate_form))
        .route("/forms", get(handlers::form::list_forms))
        .route("/forms/{id}", get(handlers::form::get_form))
        .route("/forms/{id}", delete(handlers::form::delete_form))
        .route("/forms/{id}/refine", put(handlers::form::refine_form))
        .route("/forms/{id}/title", put(handlers::form::update_title))
        .route("/forms/{id}/versions", get(handlers::form::list_versions))
        // Responses
        .route(
            "/responses/{form_id}",
            post(handlers::response::submit_response),
        )
        .route(
            "/responses/{form_id}",
            get(handlers::response::list_responses),
        );

    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let web_dir = std::env::var("FORMSMITH_WEB_DIR").unwrap_or_else(|_| "web/dist".to_string());
    if std::path::Path::new(&web_dir).exists() {
        let index_path = format!("{}/index.html", web_dir);
        let serve_dir = ServeDir::new(&web_dir).fallback(ServeFile::new(index_path));
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %web_dir, "frontend static file serving enabled");
    }

    router
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
