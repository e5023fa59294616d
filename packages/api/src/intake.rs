// ABOUTME: Request body extractors with AppError rejections
// ABOUTME: JSON bodies, and project intake from either JSON or multipart with a requirements file

use axum::{
    body::Bytes,
    extract::{
        multipart::MultipartError,
        rejection::{BytesRejection, JsonRejection},
        FromRequest, Multipart, Request,
    },
    http::{header::CONTENT_TYPE, StatusCode},
};
use kroolo_ideate::ProjectData;
use tracing::{debug, info};

use crate::error::AppError;

/// Largest requirements document accepted in a multipart upload
pub const MAX_REQUIREMENT_DOC_BYTES: usize = 10 * 1024 * 1024;

/// Request body ceiling for project intake; leaves room for the text fields
pub const PROJECT_BODY_LIMIT: usize = MAX_REQUIREMENT_DOC_BYTES + 2 * 1024 * 1024;

/// `Json` that rejects with an `AppError` body instead of axum's plain text:
/// 413 over the body limit, 400 otherwise
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

fn body_rejection(status: StatusCode, message: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(message)
    } else {
        AppError::Validation(message)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        body_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        body_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(format!(
                "Requirement document exceeds {} MB",
                MAX_REQUIREMENT_DOC_BYTES / (1024 * 1024)
            ))
        } else {
            AppError::Validation(err.body_text())
        }
    }
}

/// Project fields from a JSON body or a `multipart/form-data` form.
///
/// A missing body, an empty body, or a non-JSON content type yields empty
/// project fields; only a JSON body that fails to parse is rejected.
pub struct ProjectIntake(pub ProjectData);

impl<S> FromRequest<S> for ProjectIntake
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
            return read_multipart(multipart).await.map(Self);
        }

        if !content_type.starts_with("application/json") {
            debug!("No JSON body supplied; using empty project fields");
            return Ok(Self(ProjectData::default()));
        }

        let bytes = Bytes::from_request(req, state).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(ProjectData::default()));
        }

        serde_json::from_slice(&bytes).map(Self).map_err(|e| {
            AppError::Validation(format!(
                "Failed to parse the request body as JSON: {}",
                e
            ))
        })
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<ProjectData, AppError> {
    let mut project = ProjectData::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == "requirementDoc" {
            let file_name = field.file_name().map(str::to_owned);
            let bytes = field.bytes().await?;
            if bytes.len() > MAX_REQUIREMENT_DOC_BYTES {
                return Err(AppError::PayloadTooLarge(format!(
                    "Requirement document exceeds {} MB",
                    MAX_REQUIREMENT_DOC_BYTES / (1024 * 1024)
                )));
            }
            info!(
                "Received requirement document {} ({} bytes)",
                file_name.as_deref().unwrap_or("<unnamed>"),
                bytes.len()
            );
            project.requirement_doc = Some(String::from_utf8_lossy(&bytes).into_owned());
            continue;
        }

        let value = field.text().await?;
        match name.as_str() {
            "projectName" => project.project_name = Some(value),
            "description" => project.description = Some(value),
            "category" => project.category = Some(value),
            "priority" => project.priority = Some(value),
            "duration" => project.duration = Some(value),
            "requirements" => project.requirements = Some(value),
            other => debug!("Ignoring unknown form field: {}", other),
        }
    }

    Ok(project)
}
