// ABOUTME: HTTP request handlers for epic records
// ABOUTME: CRUD over the epic store plus an on-demand quality check

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use kroolo_ideate::assess;
use kroolo_storage::EpicDraft;
use serde_json::json;
use tracing::info;

use crate::error::ApiResult;
use crate::intake::ApiJson;
use crate::AppState;

/// Create an epic from client-supplied fields
pub async fn create_epic(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<EpicDraft>,
) -> ApiResult<impl IntoResponse> {
    info!(
        "Creating epic: {}",
        draft.title.as_deref().unwrap_or("<untitled>")
    );

    let epic = state.epics.create(draft).await?;
    Ok((StatusCode::CREATED, Json(epic)))
}

/// List all epics
pub async fn list_epics(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    info!("Listing epics");

    let epics = state.epics.list().await?;
    Ok(Json(epics))
}

pub async fn get_epic(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    info!("Getting epic: {}", id);

    let epic = state.epics.get(&id).await?;
    Ok(Json(epic))
}

/// Partial update; omitted fields keep their stored values
pub async fn update_epic(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(changes): ApiJson<EpicDraft>,
) -> ApiResult<impl IntoResponse> {
    info!("Updating epic: {}", id);

    let epic = state.epics.update(&id, changes).await?;
    Ok(Json(epic))
}

pub async fn delete_epic(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    info!("Deleting epic: {}", id);

    state.epics.delete(&id).await?;
    Ok(Json(json!({ "message": "Epic deleted successfully" })))
}

/// Score a stored epic with the quality heuristics and persist the verdict
pub async fn validate_epic(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    info!("Validating epic: {}", id);

    let epic = state.epics.get(&id).await?;
    let verdict = assess(&epic.to_draft());
    if !verdict.passed {
        info!("Epic {} has {} quality issues", id, verdict.issues.len());
    }

    let epic = state.epics.set_ai_validation(&id, verdict).await?;
    Ok(Json(epic))
}
