// ABOUTME: Schema enforcement for epic drafts
// ABOUTME: Converts an EpicDraft into a typed NewEpic or reports every violated rule

use crate::error::{Result, StorageError};
use crate::types::{AiValidation, Effort, EpicDraft, EpicStatus};

pub const MIN_TITLE_CHARS: usize = 5;
pub const MIN_OBJECTIVE_CHARS: usize = 10;
pub const MIN_SCOPE_CHARS: usize = 20;

/// An epic that passed schema validation and is ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewEpic {
    pub user_id: String,
    pub project_id: String,
    pub effort: Effort,
    pub title: String,
    pub objective: String,
    pub scope: String,
    pub status: EpicStatus,
    pub ai_validation: AiValidation,
}

fn required<'a>(field: &str, value: &'a Option<String>, issues: &mut Vec<String>) -> Option<&'a str> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            issues.push(format!("{} is required", field));
            None
        }
    }
}

fn min_chars(field: &str, value: Option<&str>, min: usize, issues: &mut Vec<String>) {
    if let Some(v) = value {
        let len = v.chars().count();
        if len < min {
            issues.push(format!(
                "{} must be at least {} characters (got {})",
                field, min, len
            ));
        }
    }
}

impl EpicDraft {
    /// Apply the store's schema rules
    pub fn validate(&self) -> Result<NewEpic> {
        let mut issues = Vec::new();

        let user_id = required("user_id", &self.user_id, &mut issues);
        let project_id = required("project_id", &self.project_id, &mut issues);
        let title = required("title", &self.title, &mut issues);
        let objective = required("objective", &self.objective, &mut issues);
        let scope = required("scope", &self.scope, &mut issues);

        let effort = match required("effort", &self.effort, &mut issues) {
            Some(raw) => raw
                .parse::<Effort>()
                .map_err(|e| issues.push(e))
                .ok(),
            None => None,
        };

        let status = match self.status.as_deref() {
            None => Some(EpicStatus::default()),
            Some(raw) => raw
                .parse::<EpicStatus>()
                .map_err(|e| issues.push(e))
                .ok(),
        };

        min_chars("title", title, MIN_TITLE_CHARS, &mut issues);
        min_chars("objective", objective, MIN_OBJECTIVE_CHARS, &mut issues);
        min_chars("scope", scope, MIN_SCOPE_CHARS, &mut issues);

        match (user_id, project_id, effort, title, objective, scope, status) {
            (
                Some(user_id),
                Some(project_id),
                Some(effort),
                Some(title),
                Some(objective),
                Some(scope),
                Some(status),
            ) if issues.is_empty() => Ok(NewEpic {
                user_id: user_id.to_string(),
                project_id: project_id.to_string(),
                effort,
                title: title.to_string(),
                objective: objective.to_string(),
                scope: scope.to_string(),
                status,
                ai_validation: self.ai_validation.clone().unwrap_or_default(),
            }),
            _ => Err(StorageError::Validation(issues.join("; "))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> EpicDraft {
        EpicDraft {
            user_id: Some("user123".into()),
            project_id: Some("project456".into()),
            effort: Some("L".into()),
            title: Some("AI-driven sprint planning".into()),
            objective: Some("Automatically plan sprints using LLMs".into()),
            scope: Some("Includes epic/user story/task generation based on specs".into()),
            status: None,
            ai_validation: None,
        }
    }

    #[test]
    fn test_complete_draft_defaults_status_and_validation() {
        let epic = complete_draft().validate().unwrap();
        assert_eq!(epic.status, EpicStatus::Generated);
        assert_eq!(epic.effort, Effort::L);
        assert_eq!(epic.ai_validation, AiValidation::default());
    }

    #[test]
    fn test_every_missing_field_is_reported() {
        let err = EpicDraft::default().validate().unwrap_err();
        let message = err.to_string();
        for field in ["user_id", "project_id", "title", "objective", "scope", "effort"] {
            assert!(
                message.contains(&format!("{} is required", field)),
                "missing report for {}: {}",
                field,
                message
            );
        }
    }

    #[test]
    fn test_only_empty_strings_count_as_missing() {
        let empty = EpicDraft {
            user_id: Some(String::new()),
            ..complete_draft()
        };
        let message = empty.validate().unwrap_err().to_string();
        assert!(message.contains("user_id is required"));

        let whitespace = EpicDraft {
            user_id: Some("   ".into()),
            ..complete_draft()
        };
        assert_eq!(whitespace.validate().unwrap().user_id, "   ");
    }

    #[test]
    fn test_invalid_enums_are_rejected() {
        let bad_effort = EpicDraft {
            effort: Some("XL".into()),
            ..complete_draft()
        };
        assert!(bad_effort.validate().unwrap_err().to_string().contains("effort `XL`"));

        let bad_status = EpicDraft {
            status: Some("archived".into()),
            ..complete_draft()
        };
        assert!(bad_status.validate().unwrap_err().to_string().contains("status `archived`"));
    }

    #[test]
    fn test_length_rules_count_chars() {
        let short = EpicDraft {
            title: Some("Tiny".into()),
            objective: Some("Too short".into()),
            scope: Some("Nineteen characters".into()),
            ..complete_draft()
        };
        let message = short.validate().unwrap_err().to_string();
        assert!(message.contains("title must be at least 5"));
        assert!(message.contains("objective must be at least 10"));
        assert!(message.contains("scope must be at least 20"));

        // Five multi-byte characters are a valid title
        let unicode = EpicDraft {
            title: Some("ééééé".into()),
            ..complete_draft()
        };
        assert!(unicode.validate().is_ok());
    }
}
