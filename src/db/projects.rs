//! Project store.
//!
//! Owns project rows together with their denormalized task counters.
//! Every project per mode except the lazily created "Inbox" default can be
//! renamed, archived, or soft-deleted. Deleting a project cascades a soft
//! delete over its member tasks inside the same transaction.

use crate::db::db::Db;
use crate::libs::messages::Message;
use crate::libs::project::{DeletionCheck, Project, ProjectMode, ProjectPatch, DEFAULT_PROJECT_NAME, MAX_PROJECTS_PER_MODE};
use crate::libs::validation::{validate_project_name, ErrorCode};
use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

const SELECT_PROJECT: &str = "SELECT id, name, mode, task_count, completed_task_count,
    is_default, is_archived, is_deleted, position, created_at, updated_at FROM projects";
const INSERT_PROJECT: &str = "INSERT INTO projects (name, mode, is_default, position, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?5)";
const COUNT_NON_DEFAULT: &str = "SELECT COUNT(*) FROM projects WHERE mode = ?1 AND is_default = 0 AND is_deleted = 0";
const COUNT_PROJECT_TASKS: &str = "SELECT COUNT(*), COALESCE(SUM(completed), 0) FROM tasks
    WHERE project_id = ?1 AND is_deleted = 0";
const SOFT_DELETE_TASKS: &str = "UPDATE tasks SET is_deleted = 1, updated_at = ?2
    WHERE project_id = ?1 AND is_deleted = 0";
const SOFT_DELETE_PROJECT: &str = "UPDATE projects SET is_deleted = 1, task_count = 0,
    completed_task_count = 0, updated_at = ?2 WHERE id = ?1";
const RECOUNT_TAG_USAGE: &str = "UPDATE tags SET usage_count =
    (SELECT COUNT(*) FROM task_tags tt JOIN tasks t ON t.id = tt.task_id
     WHERE tt.tag_id = tags.id AND t.is_deleted = 0)";

pub(crate) fn map_project(row: &Row) -> rusqlite::Result<Project> {
    let mode_str: String = row.get(2)?;
    let mode = ProjectMode::parse(&mode_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, format!("unknown project mode '{}'", mode_str).into())
    })?;
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        mode,
        task_count: row.get(3)?,
        completed_task_count: row.get(4)?,
        is_default: row.get(5)?,
        is_archived: row.get(6)?,
        is_deleted: row.get(7)?,
        position: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

pub struct Projects {
    pub conn: Connection,
}

impl Projects {
    pub fn new() -> Result<Self> {
        let db = Db::new()?;
        Ok(Self { conn: db.conn })
    }

    /// Creates a non-default project, enforcing the per-mode limit.
    ///
    /// The existing-project count and the insert run in one transaction so
    /// concurrent creates cannot slip past the limit.
    pub fn create(&mut self, name: &str, mode: ProjectMode) -> Result<Project> {
        validate_project_name(name).into_result()?;

        let tx = self.conn.transaction()?;
        let existing: i64 = tx.query_row(COUNT_NON_DEFAULT, params![mode.as_str()], |row| row.get(0))?;
        if existing >= MAX_PROJECTS_PER_MODE {
            return Err(ErrorCode::ProjectLimitReached.with_message(Message::ProjectLimitReached(MAX_PROJECTS_PER_MODE)));
        }

        let now = Utc::now();
        tx.execute(INSERT_PROJECT, params![name.trim(), mode.as_str(), false, now.timestamp_millis(), now])?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        self.require(id)
    }

    /// Non-deleted projects, optionally limited to one mode, in position order.
    pub fn fetch(&mut self, mode: Option<ProjectMode>) -> Result<Vec<Project>> {
        let (sql, params_vec): (String, Vec<String>) = match mode {
            Some(m) => (
                format!("{} WHERE is_deleted = 0 AND mode = ?1 ORDER BY position", SELECT_PROJECT),
                vec![m.as_str().to_string()],
            ),
            None => (format!("{} WHERE is_deleted = 0 ORDER BY mode, position", SELECT_PROJECT), vec![]),
        };
        let mut stmt = self.conn.prepare(&sql)?;
        let iter = stmt.query_map(rusqlite::params_from_iter(params_vec.iter()), map_project)?;

        let mut projects = Vec::new();
        for project in iter {
            projects.push(project?);
        }
        Ok(projects)
    }

    pub fn get_by_id(&mut self, id: i64) -> Result<Option<Project>> {
        self.conn
            .query_row(&format!("{} WHERE id = ?1 AND is_deleted = 0", SELECT_PROJECT), params![id], map_project)
            .optional()
            .map_err(Into::into)
    }

    fn require(&mut self, id: i64) -> Result<Project> {
        self.get_by_id(id)?
            .ok_or_else(|| ErrorCode::ProjectNotFound.with_message(Message::ProjectNotFound(id)))
    }

    /// Returns the default "Inbox" project for a mode, creating it lazily.
    pub fn get_or_create_default(&mut self, mode: ProjectMode) -> Result<Project> {
        let existing = self
            .conn
            .query_row(
                &format!("{} WHERE mode = ?1 AND is_default = 1 AND is_deleted = 0", SELECT_PROJECT),
                params![mode.as_str()],
                map_project,
            )
            .optional()?;
        if let Some(project) = existing {
            return Ok(project);
        }

        let now = Utc::now();
        self.conn.execute(
            INSERT_PROJECT,
            params![DEFAULT_PROJECT_NAME, mode.as_str(), true, now.timestamp_millis(), now],
        )?;
        let id = self.conn.last_insert_rowid();
        self.require(id)
    }

    /// Merges a partial update. Renaming the default project is rejected.
    pub fn update(&mut self, id: i64, patch: ProjectPatch) -> Result<Project> {
        let project = self.require(id)?;

        if project.is_default && patch.name.is_some() {
            return Err(ErrorCode::DefaultProjectImmutable.with_message(Message::DefaultProjectImmutable));
        }
        if let Some(name) = &patch.name {
            validate_project_name(name).into_result()?;
        }

        let name = patch.name.map(|n| n.trim().to_string()).unwrap_or(project.name);
        let is_archived = patch.is_archived.unwrap_or(project.is_archived);
        let position = patch.position.unwrap_or(project.position);
        self.conn.execute(
            "UPDATE projects SET name = ?2, is_archived = ?3, position = ?4, updated_at = ?5 WHERE id = ?1",
            params![id, name, is_archived, position, Utc::now()],
        )?;

        self.require(id)
    }

    /// Counts live member tasks split by completion, so callers can warn
    /// about incomplete-task loss before deletion.
    pub fn check_deletion(&mut self, id: i64) -> Result<DeletionCheck> {
        self.require(id)?;
        let (total, completed): (i64, i64) =
            self.conn
                .query_row(COUNT_PROJECT_TASKS, params![id], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(DeletionCheck {
            task_count: total,
            completed_count: completed,
            incomplete_count: total - completed,
        })
    }

    /// Soft-deletes a project and its member tasks.
    ///
    /// The default project is undeletable. A project with incomplete tasks
    /// requires `confirm = true`; otherwise the call fails with a
    /// confirmation-required error and nothing is written.
    pub fn delete(&mut self, id: i64, confirm: bool) -> Result<()> {
        let project = self.require(id)?;
        if project.is_default {
            return Err(ErrorCode::DefaultProjectImmutable.with_message(Message::DefaultProjectImmutable));
        }

        let check = self.check_deletion(id)?;
        if check.requires_confirmation() && !confirm {
            return Err(
                ErrorCode::ConfirmationRequired.with_message(Message::ProjectHasIncompleteTasks(project.name, check.incomplete_count))
            );
        }

        let now = Utc::now();
        let tx = self.conn.transaction()?;
        tx.execute(SOFT_DELETE_TASKS, params![id, now])?;
        tx.execute(SOFT_DELETE_PROJECT, params![id, now])?;
        // Tag usage counts refer to non-deleted tasks only
        tx.execute(RECOUNT_TAG_USAGE, [])?;
        tx.commit()?;

        Ok(())
    }
}
