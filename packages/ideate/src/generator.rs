// ABOUTME: Epic generation pipeline: prompt, model call, strict parse, normalization
// ABOUTME: Produces EpicDrafts; the record store is the validation gate

use std::sync::Arc;

use kroolo_ai::{strip_code_fences, TextGenerator};
use kroolo_storage::{EpicDraft, EpicStatus};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::GenerationError;
use crate::prompts::construct_prompt;
use crate::types::ProjectData;

/// Placeholder owner for epics that have not been claimed yet
pub const PENDING: &str = "pending";

pub struct EpicGenerator {
    model: Arc<dyn TextGenerator>,
}

impl EpicGenerator {
    pub fn new(model: Arc<dyn TextGenerator>) -> Self {
        Self { model }
    }

    /// Draft epics for a project. One model call, no retries.
    pub async fn generate_epics(
        &self,
        project: &ProjectData,
    ) -> Result<Vec<EpicDraft>, GenerationError> {
        let prompt = construct_prompt(project);

        info!(
            "Generating epics for project: {}",
            project.project_name.as_deref().unwrap_or("<unnamed>")
        );

        let raw = self.model.generate_text(&prompt).await.map_err(|e| {
            error!("Error generating epics: {}", e);
            GenerationError::Model(e)
        })?;

        let items = parse_epic_response(&raw)?;
        let drafts = validate_and_format_epics(items);

        info!("Model drafted {} epics", drafts.len());
        Ok(drafts)
    }
}

/// Strictly parse the model's reply as a non-empty JSON array
pub fn parse_epic_response(raw: &str) -> Result<Vec<Value>, GenerationError> {
    let json_text = strip_code_fences(raw);

    let items: Vec<Value> = serde_json::from_str(json_text).map_err(|e| {
        error!(
            "JSON parsing failed: {}. JSON snippet: {}",
            e,
            json_text.chars().take(500).collect::<String>()
        );
        GenerationError::MalformedResponse(e.to_string())
    })?;

    if items.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(items)
}

fn text_field(item: &Value, index: usize, key: &str) -> Option<String> {
    match item.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            warn!(
                "Epic {} has non-string `{}` ({}); leaving it unset",
                index, key, other
            );
            None
        }
    }
}

/// Map every parsed item to a pending draft, passing fields through untouched
pub fn validate_and_format_epics(items: Vec<Value>) -> Vec<EpicDraft> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                warn!("Epic {} is not a JSON object", index);
            }
            EpicDraft {
                user_id: Some(PENDING.to_string()),
                project_id: Some(PENDING.to_string()),
                effort: text_field(item, index, "effort"),
                title: text_field(item, index, "title"),
                objective: text_field(item, index, "objective"),
                scope: text_field(item, index, "scope"),
                status: Some(EpicStatus::Generated.to_string()),
                ai_validation: None,
            }
        })
        .collect()
}
