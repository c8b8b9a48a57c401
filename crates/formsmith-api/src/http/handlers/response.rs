//! Response submission and retrieval handlers.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};

use formsmith_types::error::FormError;
use formsmith_types::form::{FormId, SubmitResponseRequest};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

fn parse_form_id(raw: &str) -> Result<FormId, AppError> {
    raw.parse().map_err(|_| AppError::Form(FormError::NotFound))
}

/// POST /api/v1/responses/:form_id - Submit a response to a form.
///
/// Public: anyone with the form link can submit. The payload is stored
/// as-is without schema validation.
pub async fn submit_response(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Json(body): Json<SubmitResponseRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let form_id = parse_form_id(&form_id)?;
    let response = state.form_service.submit_response(&form_id, body.data).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let response_json = serde_json::to_value(&response).unwrap();
    let resp = ApiResponse::success(response_json, request_id, elapsed)
        .with_link("form", &format!("/api/v1/forms/{}", form_id));

    Ok(Json(resp))
}

/// GET /api/v1/responses/:form_id - List responses for an owned form.
pub async fn list_responses(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(form_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let form_id = parse_form_id(&form_id)?;
    let responses = state
        .form_service
        .list_responses(&auth.owner_id, &form_id)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let responses_json: Vec<serde_json::Value> = responses
        .iter()
        .map(|r| serde_json::to_value(r).unwrap())
        .collect();

    let resp = ApiResponse::success(responses_json, request_id, elapsed)
        .with_link("self", &format!("/api/v1/responses/{}", form_id))
        .with_link("form", &format!("/api/v1/forms/{}", form_id));

    Ok(Json(resp))
}
