// ABOUTME: Epic quality checks for AI validation passes
// ABOUTME: Pure predicates and issue lists that populate the ai_validation sub-structure

use kroolo_storage::{
    AiValidation, Effort, EpicDraft, MIN_OBJECTIVE_CHARS, MIN_SCOPE_CHARS, MIN_TITLE_CHARS,
};

pub const MAX_TITLE_CHARS: usize = 100;

fn char_len(value: &Option<String>) -> Option<usize> {
    value.as_deref().map(|v| v.chars().count())
}

fn effort_is_valid(epic: &EpicDraft) -> bool {
    epic.effort
        .as_deref()
        .is_some_and(|e| e.parse::<Effort>().is_ok())
}

/// True when the epic meets every length and effort rule
pub fn validate_epic_quality(epic: &EpicDraft) -> bool {
    let title_ok = char_len(&epic.title)
        .is_some_and(|len| (MIN_TITLE_CHARS..=MAX_TITLE_CHARS).contains(&len));
    let objective_ok = char_len(&epic.objective).is_some_and(|len| len >= MIN_OBJECTIVE_CHARS);
    let scope_ok = char_len(&epic.scope).is_some_and(|len| len >= MIN_SCOPE_CHARS);

    title_ok && objective_ok && scope_ok && effort_is_valid(epic)
}

/// Human-readable problems with an epic, empty when none are found
pub fn identify_issues(epic: &EpicDraft) -> Vec<String> {
    let mut issues = Vec::new();

    if char_len(&epic.title).map_or(true, |len| len < MIN_TITLE_CHARS) {
        issues.push("Title is too short or missing".to_string());
    }
    if char_len(&epic.objective).map_or(true, |len| len < MIN_OBJECTIVE_CHARS) {
        issues.push("Objective needs more detail".to_string());
    }
    if char_len(&epic.scope).map_or(true, |len| len < MIN_SCOPE_CHARS) {
        issues.push("Scope needs more detail".to_string());
    }
    if !effort_is_valid(epic) {
        issues.push("Invalid effort size".to_string());
    }

    issues
}

/// Run both checks and package the outcome for storage
pub fn assess(epic: &EpicDraft) -> AiValidation {
    AiValidation {
        passed: validate_epic_quality(epic),
        issues: identify_issues(epic),
        suggested_changes: None,
    }
}
