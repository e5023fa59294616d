// ABOUTME: Error types for the ideate package
// ABOUTME: Generation failures and project workflow failures

use kroolo_ai::AIServiceError;
use kroolo_storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("AI service error: {0}")]
    Model(#[from] AIServiceError),

    #[error("Model returned malformed JSON: {0}")]
    MalformedResponse(String),

    #[error("Model returned no epics")]
    EmptyResponse,
}

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("Epic generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, ProjectError>;
