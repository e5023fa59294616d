// ABOUTME: Epic storage layer using SQLite
// ABOUTME: Handles validated CRUD, transactional bulk insert, and project-wide replacement

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{Result, StorageError};
use crate::types::{AiValidation, Epic, EpicDraft};
use crate::validation::NewEpic;

const SELECT_EPIC: &str = r#"
    SELECT
        id, user_id, project_id, effort, title, objective, scope, status,
        ai_passed, ai_issues, ai_suggested_changes, created_at, updated_at
    FROM epics
"#;

pub struct EpicStorage {
    pool: SqlitePool,
}

impl EpicStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, draft: EpicDraft) -> Result<Epic> {
        let epic = draft.validate()?;
        let mut conn = self.pool.acquire().await?;
        insert_epic(&mut conn, epic).await
    }

    pub async fn list(&self) -> Result<Vec<Epic>> {
        debug!("Fetching all epics");

        let rows = sqlx::query(&format!("{} ORDER BY rowid", SELECT_EPIC))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_epic).collect()
    }

    pub async fn list_by_project(&self, project_id: &str) -> Result<Vec<Epic>> {
        debug!("Fetching epics for project: {}", project_id);

        let rows = sqlx::query(&format!(
            "{} WHERE project_id = ? ORDER BY rowid",
            SELECT_EPIC
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_epic).collect()
    }

    pub async fn get(&self, id: &str) -> Result<Epic> {
        debug!("Fetching epic: {}", id);

        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_EPIC))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        row_to_epic(&row)
    }

    /// Overlay the provided fields on the stored record and re-validate the result.
    ///
    /// The write is a single autocommit UPDATE so it never holds a read lock
    /// while waiting for the write lock. Concurrent updates to one epic are
    /// last-writer-wins.
    pub async fn update(&self, id: &str, changes: EpicDraft) -> Result<Epic> {
        debug!("Updating epic: {}", id);

        let current = self.get(id).await?;
        let merged = changes.merged_over(current.to_draft()).validate()?;
        let now = Utc::now();
        let issues = serde_json::to_string(&merged.ai_validation.issues)?;
        let suggested = merged
            .ai_validation
            .suggested_changes
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let result = sqlx::query(
            r#"
            UPDATE epics SET
                user_id = ?, project_id = ?, effort = ?, title = ?, objective = ?,
                scope = ?, status = ?, ai_passed = ?, ai_issues = ?,
                ai_suggested_changes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&merged.user_id)
        .bind(&merged.project_id)
        .bind(merged.effort.as_str())
        .bind(&merged.title)
        .bind(&merged.objective)
        .bind(&merged.scope)
        .bind(merged.status.as_str())
        .bind(merged.ai_validation.passed)
        .bind(issues)
        .bind(suggested)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        // Deleted between the read and the write
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(Epic {
            id: current.id,
            user_id: merged.user_id,
            project_id: merged.project_id,
            effort: merged.effort,
            title: merged.title,
            objective: merged.objective,
            scope: merged.scope,
            status: merged.status,
            ai_validation: merged.ai_validation,
            created_at: current.created_at,
            updated_at: now,
        })
    }

    /// Replace only the ai_validation sub-structure
    pub async fn set_ai_validation(&self, id: &str, validation: AiValidation) -> Result<Epic> {
        debug!("Recording AI validation for epic: {}", id);

        let issues = serde_json::to_string(&validation.issues)?;
        let suggested = validation
            .suggested_changes
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let result = sqlx::query(
            r#"
            UPDATE epics SET
                ai_passed = ?, ai_issues = ?, ai_suggested_changes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(validation.passed)
        .bind(issues)
        .bind(suggested)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        self.get(id).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        debug!("Deleting epic: {}", id);

        let result = sqlx::query("DELETE FROM epics WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    /// Insert a batch atomically: one invalid draft rejects the whole batch
    pub async fn insert_many(&self, drafts: Vec<EpicDraft>) -> Result<Vec<Epic>> {
        let epics = validate_batch(&drafts)?;

        let mut tx = self.pool.begin().await?;
        let mut saved = Vec::with_capacity(epics.len());
        for epic in epics {
            saved.push(insert_epic(&mut tx, epic).await?);
        }
        tx.commit().await?;

        info!("Inserted {} epics", saved.len());
        Ok(saved)
    }

    /// Remove every epic belonging to `project_id`; returns the number removed
    pub async fn delete_by_project(&self, project_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM epics WHERE project_id = ?")
            .bind(project_id)
            .execute(&self.pool)
            .await?;

        debug!(
            "Deleted {} epics for project: {}",
            result.rows_affected(),
            project_id
        );
        Ok(result.rows_affected())
    }

    /// Swap a project's epic set for `drafts` inside one transaction
    pub async fn replace_project_epics(
        &self,
        project_id: &str,
        drafts: Vec<EpicDraft>,
    ) -> Result<Vec<Epic>> {
        let epics = validate_batch(&drafts)?;

        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM epics WHERE project_id = ?")
            .bind(project_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let mut saved = Vec::with_capacity(epics.len());
        for epic in epics {
            saved.push(insert_epic(&mut tx, epic).await?);
        }
        tx.commit().await?;

        info!(
            "Replaced {} epics with {} for project: {}",
            removed,
            saved.len(),
            project_id
        );
        Ok(saved)
    }
}

fn validate_batch(drafts: &[EpicDraft]) -> Result<Vec<NewEpic>> {
    drafts
        .iter()
        .enumerate()
        .map(|(index, draft)| {
            draft.validate().map_err(|e| match e {
                StorageError::Validation(msg) => {
                    StorageError::Validation(format!("epic at index {}: {}", index, msg))
                }
                other => other,
            })
        })
        .collect()
}

async fn insert_epic(conn: &mut SqliteConnection, epic: NewEpic) -> Result<Epic> {
    let id = nanoid::nanoid!();
    let now = Utc::now();
    let issues = serde_json::to_string(&epic.ai_validation.issues)?;
    let suggested = epic
        .ai_validation
        .suggested_changes
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    debug!("Creating epic: {} for project: {}", id, epic.project_id);

    sqlx::query(
        r#"
        INSERT INTO epics (
            id, user_id, project_id, effort, title, objective, scope, status,
            ai_passed, ai_issues, ai_suggested_changes, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&epic.user_id)
    .bind(&epic.project_id)
    .bind(epic.effort.as_str())
    .bind(&epic.title)
    .bind(&epic.objective)
    .bind(&epic.scope)
    .bind(epic.status.as_str())
    .bind(epic.ai_validation.passed)
    .bind(issues)
    .bind(suggested)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(Epic {
        id,
        user_id: epic.user_id,
        project_id: epic.project_id,
        effort: epic.effort,
        title: epic.title,
        objective: epic.objective,
        scope: epic.scope,
        status: epic.status,
        ai_validation: epic.ai_validation,
        created_at: now,
        updated_at: now,
    })
}

fn row_to_epic(row: &SqliteRow) -> Result<Epic> {
    let effort: String = row.try_get("effort")?;
    let status: String = row.try_get("status")?;
    let issues: String = row.try_get("ai_issues")?;
    let suggested: Option<String> = row.try_get("ai_suggested_changes")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    Ok(Epic {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        project_id: row.try_get("project_id")?,
        effort: effort.parse().map_err(StorageError::Corrupt)?,
        title: row.try_get("title")?,
        objective: row.try_get("objective")?,
        scope: row.try_get("scope")?,
        status: status.parse().map_err(StorageError::Corrupt)?,
        ai_validation: AiValidation {
            passed: row.try_get("ai_passed")?,
            issues: serde_json::from_str(&issues)?,
            suggested_changes: suggested.as_deref().map(serde_json::from_str).transpose()?,
        },
        created_at,
        updated_at,
    })
}
