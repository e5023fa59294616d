// ABOUTME: Epic record types and their wire representation
// ABOUTME: Defines the persisted Epic, its enums, and the loosely-typed EpicDraft input

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse size of an epic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effort {
    /// 2-5 days
    S,
    /// 1-2 weeks
    M,
    /// 2-4 weeks
    L,
}

impl Effort {
    pub const ALLOWED: &'static [&'static str] = &["S", "M", "L"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
        }
    }
}

impl FromStr for Effort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S" => Ok(Self::S),
            "M" => Ok(Self::M),
            "L" => Ok(Self::L),
            other => Err(format!(
                "effort `{}` is not one of {}",
                other,
                Self::ALLOWED.join(", ")
            )),
        }
    }
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Epic lifecycle marker. Any value may be written at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpicStatus {
    #[default]
    Generated,
    Validated,
    Edited,
    Done,
}

impl EpicStatus {
    pub const ALLOWED: &'static [&'static str] = &["generated", "validated", "edited", "done"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generated => "generated",
            Self::Validated => "validated",
            Self::Edited => "edited",
            Self::Done => "done",
        }
    }
}

impl FromStr for EpicStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generated" => Ok(Self::Generated),
            "validated" => Ok(Self::Validated),
            "edited" => Ok(Self::Edited),
            "done" => Ok(Self::Done),
            other => Err(format!(
                "status `{}` is not one of {}",
                other,
                Self::ALLOWED.join(", ")
            )),
        }
    }
}

impl fmt::Display for EpicStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an AI quality pass over an epic
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiValidation {
    pub passed: bool,
    pub issues: Vec<String>,
    pub suggested_changes: Option<serde_json::Value>,
}

/// Persisted epic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Epic {
    pub id: String,
    pub user_id: String,
    pub project_id: String,
    pub effort: Effort,
    pub title: String,
    pub objective: String,
    pub scope: String,
    pub status: EpicStatus,
    pub ai_validation: AiValidation,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Epic {
    /// Fully-populated draft carrying this record's current values
    pub fn to_draft(&self) -> EpicDraft {
        EpicDraft {
            user_id: Some(self.user_id.clone()),
            project_id: Some(self.project_id.clone()),
            effort: Some(self.effort.to_string()),
            title: Some(self.title.clone()),
            objective: Some(self.objective.clone()),
            scope: Some(self.scope.clone()),
            status: Some(self.status.to_string()),
            ai_validation: Some(self.ai_validation.clone()),
        }
    }
}

/// Unvalidated epic fields, as sent by clients or produced by the generator.
///
/// Every field is optional so that gaps surface as store validation errors
/// instead of decoder errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpicDraft {
    pub user_id: Option<String>,
    pub project_id: Option<String>,
    pub effort: Option<String>,
    pub title: Option<String>,
    pub objective: Option<String>,
    pub scope: Option<String>,
    pub status: Option<String>,
    pub ai_validation: Option<AiValidation>,
}

impl EpicDraft {
    /// Fields set on `self` win; everything else falls back to `base`
    pub fn merged_over(self, base: EpicDraft) -> EpicDraft {
        EpicDraft {
            user_id: self.user_id.or(base.user_id),
            project_id: self.project_id.or(base.project_id),
            effort: self.effort.or(base.effort),
            title: self.title.or(base.title),
            objective: self.objective.or(base.objective),
            scope: self.scope.or(base.scope),
            status: self.status.or(base.status),
            ai_validation: self.ai_validation.or(base.ai_validation),
        }
    }
}
