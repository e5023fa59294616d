// ABOUTME: Project intake types
// ABOUTME: ProjectData is consumed once per generation and never persisted

use serde::{Deserialize, Deserializer, Serialize};

/// Project metadata submitted for epic generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectData {
    pub project_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    /// Days; clients send either a string or a number
    #[serde(deserialize_with = "string_or_number")]
    pub duration: Option<String>,
    pub requirements: Option<String>,
    /// Text of an uploaded requirements document
    pub requirement_doc: Option<String>,
}

impl ProjectData {
    /// Free-text requirements with any uploaded document appended
    pub fn combined_requirements(&self) -> Option<String> {
        let requirements = self.requirements.as_deref().filter(|r| !r.trim().is_empty());
        let document = self.requirement_doc.as_deref().filter(|d| !d.trim().is_empty());

        match (requirements, document) {
            (Some(r), Some(d)) => Some(format!("{}\n\nRequirements document:\n{}", r, d)),
            (Some(r), None) => Some(r.to_string()),
            (None, Some(d)) => Some(format!("Requirements document:\n{}", d)),
            (None, None) => None,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_duration_accepts_numbers_and_strings() {
        let numeric: ProjectData = serde_json::from_value(json!({ "duration": 45 })).unwrap();
        assert_eq!(numeric.duration.as_deref(), Some("45"));

        let text: ProjectData = serde_json::from_value(json!({ "duration": "15" })).unwrap();
        assert_eq!(text.duration.as_deref(), Some("15"));

        let missing: ProjectData = serde_json::from_value(json!({})).unwrap();
        assert!(missing.duration.is_none());
    }

    #[test]
    fn test_camel_case_keys() {
        let data: ProjectData = serde_json::from_value(json!({
            "projectName": "Blog",
            "requirementDoc": "Spec text"
        }))
        .unwrap();
        assert_eq!(data.project_name.as_deref(), Some("Blog"));
        assert_eq!(data.requirement_doc.as_deref(), Some("Spec text"));
    }

    #[test]
    fn test_combined_requirements_folds_document() {
        let data = ProjectData {
            requirements: Some("posts, comments".into()),
            requirement_doc: Some("Must support RSS".into()),
            ..Default::default()
        };
        let combined = data.combined_requirements().unwrap();
        assert!(combined.starts_with("posts, comments"));
        assert!(combined.ends_with("Must support RSS"));

        let doc_only = ProjectData {
            requirement_doc: Some("Must support RSS".into()),
            ..Default::default()
        };
        assert_eq!(
            doc_only.combined_requirements().as_deref(),
            Some("Requirements document:\nMust support RSS")
        );

        assert!(ProjectData::default().combined_requirements().is_none());
    }
}
