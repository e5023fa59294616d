// ABOUTME: Project-level epic workflows
// ABOUTME: Generates epics from intake and persists them, or regenerates a project's epic set

use std::sync::Arc;

use kroolo_storage::{Epic, EpicStorage};
use tracing::info;

use crate::error::Result;
use crate::generator::EpicGenerator;
use crate::types::ProjectData;

pub struct ProjectService {
    generator: EpicGenerator,
    storage: Arc<EpicStorage>,
}

impl ProjectService {
    pub fn new(generator: EpicGenerator, storage: Arc<EpicStorage>) -> Self {
        Self { generator, storage }
    }

    /// Generate epics for a new project and insert them as one batch
    pub async fn create_project(&self, project: ProjectData) -> Result<Vec<Epic>> {
        let drafts = self.generator.generate_epics(&project).await?;
        let saved = self.storage.insert_many(drafts).await?;

        info!(
            "Created project '{}' with {} epics",
            project.project_name.as_deref().unwrap_or("<unnamed>"),
            saved.len()
        );
        Ok(saved)
    }

    /// Replace every epic of `project_id` with a fresh batch.
    ///
    /// Existing epics are only touched after generation succeeds, and the
    /// delete and insert share a transaction.
    pub async fn regenerate_epics(
        &self,
        project_id: &str,
        project: ProjectData,
    ) -> Result<Vec<Epic>> {
        let drafts = self
            .generator
            .generate_epics(&project)
            .await?
            .into_iter()
            .map(|mut draft| {
                draft.project_id = Some(project_id.to_string());
                draft
            })
            .collect();

        let saved = self.storage.replace_project_epics(project_id, drafts).await?;

        info!("Regenerated {} epics for project: {}", saved.len(), project_id);
        Ok(saved)
    }
}
