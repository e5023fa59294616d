// ABOUTME: Epic ideation library
// ABOUTME: Prompt construction, epic generation, quality checks, and project workflows

pub mod error;
pub mod generator;
pub mod project_service;
pub mod prompts;
pub mod quality;
pub mod types;

pub use error::{GenerationError, ProjectError, Result};
pub use generator::{parse_epic_response, validate_and_format_epics, EpicGenerator, PENDING};
pub use project_service::ProjectService;
pub use prompts::construct_prompt;
pub use quality::{assess, identify_issues, validate_epic_quality};
pub use types::ProjectData;
