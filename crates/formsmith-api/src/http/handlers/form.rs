//! Form lifecycle handlers for the REST API.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};

use formsmith_types::error::FormError;
use formsmith_types::form::{
    FormId, GenerateFormRequest, RefineFormRequest, UpdateTitleRequest,
};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

fn parse_form_id(raw: &str) -> Result<FormId, AppError> {
    raw.parse().map_err(|_| AppError::Form(FormError::NotFound))
}

/// POST /api/v1/forms/generate - Generate a new form from a prompt.
pub async fn generate_form(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<GenerateFormRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let (form, followups) = state
        .form_service
        .generate_form(&auth.owner_id, body.title, &body.prompt)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let payload = serde_json::json!({
        "form": form,
        "followups": followups,
    });
    let resp = ApiResponse::success(payload, request_id, elapsed)
        .with_link("self", &format!("/api/v1/forms/{}", form.id))
        .with_link("refine", &format!("/api/v1/forms/{}/refine", form.id))
        .with_link("responses", &format!("/api/v1/responses/{}", form.id));

    Ok(Json(resp))
}

/// GET /api/v1/forms - List the caller's forms, newest first.
pub async fn list_forms(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let forms = state.form_service.list_forms(&auth.owner_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let forms_json: Vec<serde_json::Value> = forms
        .iter()
        .map(|f| serde_json::to_value(f).unwrap())
        .collect();

    let resp = ApiResponse::success(forms_json, request_id, elapsed)
        .with_link("self", "/api/v1/forms");

    Ok(Json(resp))
}

/// GET /api/v1/forms/:id - Get a form with its version ledger.
///
/// Public: no auth, so forms are shareable for rendering and submission.
pub async fn get_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let form_id = parse_form_id(&id)?;
    let (form, versions) = state.form_service.get_form(&form_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let payload = serde_json::json!({
        "form": form,
        "versions": versions,
    });
    let resp = ApiResponse::success(payload, request_id, elapsed)
        .with_link("self", &format!("/api/v1/forms/{}", form.id))
        .with_link("submit", &format!("/api/v1/responses/{}", form.id));

    Ok(Json(resp))
}

/// PUT /api/v1/forms/:id/refine - Refine a form with an instruction.
pub async fn refine_form(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(body): Json<RefineFormRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let form_id = parse_form_id(&id)?;
    let (form, followups) = state
        .form_service
        .refine_form(&auth.owner_id, &form_id, &body.instruction)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let payload = serde_json::json!({
        "form": form,
        "followups": followups,
    });
    let resp = ApiResponse::success(payload, request_id, elapsed)
        .with_link("self", &format!("/api/v1/forms/{}", form.id))
        .with_link("versions", &format!("/api/v1/forms/{}/versions", form.id));

    Ok(Json(resp))
}

/// PUT /api/v1/forms/:id/title - Rename a form.
pub async fn update_title(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(body): Json<UpdateTitleRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let form_id = parse_form_id(&id)?;
    let form = state
        .form_service
        .update_title(&auth.owner_id, &form_id, &body.title)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let form_json = serde_json::to_value(&form).unwrap();
    let resp = ApiResponse::success(form_json, request_id, elapsed)
        .with_link("self", &format!("/api/v1/forms/{}", form.id));

    Ok(Json(resp))
}

/// DELETE /api/v1/forms/:id - Delete a form and everything under it.
pub async fn delete_form(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let form_id = parse_form_id(&id)?;
    state
        .form_service
        .delete_form(&auth.owner_id, &form_id)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::json!({"deleted": true, "id": id}),
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}

/// GET /api/v1/forms/:id/versions - The form's version ledger, newest first.
pub async fn list_versions(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let form_id = parse_form_id(&id)?;
    // get_form already loads the ledger; reuse it and check ownership here
    // since the ledger exposes every change prompt the owner ever typed.
    let (form, versions) = state.form_service.get_form(&form_id).await?;
    if form.owner_id != auth.owner_id {
        return Err(AppError::Form(FormError::NotFound));
    }
    let elapsed = start.elapsed().as_millis() as u64;

    let versions_json: Vec<serde_json::Value> = versions
        .iter()
        .map(|v| serde_json::to_value(v).unwrap())
        .collect();

    let resp = ApiResponse::success(versions_json, request_id, elapsed)
        .with_link("self", &format!("/api/v1/forms/{}/versions", form.id))
        .with_link("form", &format!("/api/v1/forms/{}", form.id));

    Ok(Json(resp))
}
