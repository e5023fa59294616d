// ABOUTME: HTTP API layer for Kroolo providing REST endpoints and routing
// ABOUTME: Shared state, route tables, and the API key guard in front of every route

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use kroolo_ai::TextGenerator;
use kroolo_ideate::{EpicGenerator, ProjectService};
use kroolo_storage::{EpicStorage, SqlitePool};

pub mod auth;
pub mod epic_handlers;
pub mod error;
pub mod intake;
pub mod project_handlers;

pub use auth::{api_key_middleware, ApiKey, API_KEY_HEADER};
pub use error::{ApiResult, AppError};

/// Handles shared by every request
#[derive(Clone)]
pub struct AppState {
    pub epics: Arc<EpicStorage>,
    pub projects: Arc<ProjectService>,
    pub api_key: ApiKey,
}

impl AppState {
    pub fn new(pool: SqlitePool, model: Arc<dyn TextGenerator>, api_key: impl Into<Arc<str>>) -> Self {
        let epics = Arc::new(EpicStorage::new(pool));
        let projects = Arc::new(ProjectService::new(
            EpicGenerator::new(model),
            epics.clone(),
        ));

        Self {
            epics,
            projects,
            api_key: ApiKey::new(api_key),
        }
    }
}

/// Creates the epics API router (nested under /api/epics)
pub fn create_epics_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(epic_handlers::list_epics).post(epic_handlers::create_epic),
        )
        .route(
            "/{id}",
            get(epic_handlers::get_epic)
                .put(epic_handlers::update_epic)
                .delete(epic_handlers::delete_epic),
        )
        .route("/{id}/validate", post(epic_handlers::validate_epic))
}

/// Creates the projects API router (nested under /api/projects)
pub fn create_projects_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(project_handlers::create_project)
                .layer(DefaultBodyLimit::max(intake::PROJECT_BODY_LIMIT)),
        )
        .route(
            "/{project_id}/regenerate-epics",
            post(project_handlers::regenerate_epics),
        )
}

/// Full application router; every route sits behind the API key middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/epics", create_epics_router())
        .nest("/api/projects", create_projects_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ))
        .with_state(state)
}
