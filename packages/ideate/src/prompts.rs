// ABOUTME: Prompt template for epic generation
// ABOUTME: Renders project intake into the fixed epic-writing instructions

use crate::types::ProjectData;

const NOT_SPECIFIED: &str = "Not specified";

fn field(value: &Option<String>) -> &str {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(NOT_SPECIFIED)
}

/// Build the epic generation prompt. Pure and deterministic.
pub fn construct_prompt(project: &ProjectData) -> String {
    let duration = project
        .duration
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(|d| format!("{} days", d))
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());
    let requirements = project
        .combined_requirements()
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());

    format!(
        r#"Act as an expert Agile Project Manager and Epic Writer.

Project Context:
- Name: {name}
- Description: {description}
- Category: {category}
- Priority: {priority}
- Duration: {duration}
- Technical Requirements: {requirements}

Task: Generate a set of comprehensive epics for this project following these guidelines:

1. Each epic should:
   - Be focused on a significant feature or capability
   - Have clear, measurable objectives
   - Be sized appropriately (L/M/S based on complexity and effort)
   - Be independent and deliverable on its own
   - Have clear scope boundaries

2. Consider these aspects when generating epics:
   - Core functionality and features
   - User experience and interface needs
   - Technical architecture components
   - Integration requirements
   - Data management needs
   - Infrastructure requirements

For effort sizing:
- L (Large): Complex features requiring significant development time (2-4 weeks)
- M (Medium): Moderate complexity features (1-2 weeks)
- S (Small): Simple, straightforward features (2-5 days)

Format each epic in this exact JSON structure:
{{
  "effort": "L/M/S",
  "title": "Clear, descriptive title of the epic",
  "objective": "What this epic aims to achieve and its value to users/project",
  "scope": "Detailed description of what is included and what is not included"
}}

Return a JSON array of 3-7 epics that collectively cover the entire project scope.
Respond with the JSON array only, without any surrounding prose.
Ensure each epic is independent yet collectively comprehensive."#,
        name = field(&project.project_name),
        description = field(&project.description),
        category = field(&project.category),
        priority = field(&project.priority),
        duration = duration,
        requirements = requirements,
    )
}
