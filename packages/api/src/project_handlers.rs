// ABOUTME: HTTP request handlers for project-level epic generation
// ABOUTME: Creates a project's epics from intake or regenerates an existing project's set

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use kroolo_storage::Epic;
use serde::Serialize;
use tracing::info;

use crate::error::{ApiResult, AppError};
use crate::intake::ProjectIntake;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProjectEpicsResponse {
    pub message: &'static str,
    pub epics: Vec<Epic>,
}

/// Generate and store epics for a new project
pub async fn create_project(
    State(state): State<AppState>,
    ProjectIntake(project): ProjectIntake,
) -> ApiResult<impl IntoResponse> {
    info!(
        "Creating project: {}",
        project.project_name.as_deref().unwrap_or("<unnamed>")
    );

    let epics = state
        .projects
        .create_project(project)
        .await
        .map_err(|e| AppError::project("Failed to create project and generate epics", e))?;

    Ok((
        StatusCode::CREATED,
        Json(ProjectEpicsResponse {
            message: "Project created and epics generated successfully",
            epics,
        }),
    ))
}

/// Replace a project's epics with a freshly generated set
pub async fn regenerate_epics(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    ProjectIntake(project): ProjectIntake,
) -> ApiResult<impl IntoResponse> {
    info!("Regenerating epics for project: {}", project_id);

    let epics = state
        .projects
        .regenerate_epics(&project_id, project)
        .await
        .map_err(|e| AppError::project("Failed to regenerate epics", e))?;

    Ok(Json(ProjectEpicsResponse {
        message: "Epics regenerated successfully",
        epics,
    }))
}
