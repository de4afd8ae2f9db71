//! Task store and inline counter reconciliation.
//!
//! Every task mutation that touches a project's membership or completion
//! state adjusts the project's `task_count`/`completed_task_count` inside
//! the same transaction, using relative SQL updates
//! (`task_count = task_count + 1`). The client never reads a counter to
//! write it back, so concurrent mutations cannot lose adjustments.
//!
//! Deletion is always soft: rows keep their history with `is_deleted = 1`
//! and are excluded from every fetch. `purge_deleted` removes them for good.

use crate::db::db::Db;
use crate::libs::messages::Message;
use crate::libs::project::{ProjectMode, DEFAULT_PROJECT_NAME};
use crate::libs::task::{today_utc_range, NewTask, Task, TaskFilter, TaskPatch, TaskPriority, TaskStatus};
use crate::libs::validation::{validate_description, validate_task_title, validate_tag, ErrorCode};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

const SELECT_TASKS: &str = "SELECT id, title, description, status, priority, project_id,
    due_date, completed, completed_at, position, is_deleted, created_at, updated_at FROM tasks";
const INSERT_TASK: &str = "INSERT INTO tasks
    (title, description, status, priority, project_id, due_date, completed, completed_at, position, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)";
const UPDATE_TASK: &str = "UPDATE tasks SET title = ?2, description = ?3, status = ?4, priority = ?5,
    project_id = ?6, due_date = ?7, completed = ?8, completed_at = ?9, updated_at = ?10 WHERE id = ?1";
const SOFT_DELETE_TASK: &str = "UPDATE tasks SET is_deleted = 1, updated_at = ?2 WHERE id = ?1";
const INC_TASK_COUNT: &str = "UPDATE projects SET task_count = task_count + ?2 WHERE id = ?1";
const INC_COMPLETED_COUNT: &str = "UPDATE projects SET completed_task_count = completed_task_count + ?2 WHERE id = ?1";
const DEC_TAG_USAGE_FOR_TASK: &str = "UPDATE tags SET usage_count = usage_count - 1
    WHERE id IN (SELECT tag_id FROM task_tags WHERE task_id = ?1)";

fn map_task(row: &Row) -> rusqlite::Result<Task> {
    let status_str: String = row.get(3)?;
    let status = TaskStatus::parse(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, format!("unknown task status '{}'", status_str).into())
    })?;
    let priority_str: String = row.get(4)?;
    let priority = TaskPriority::parse(&priority_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, format!("unknown priority '{}'", priority_str).into())
    })?;
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status,
        priority,
        project_id: row.get(5)?,
        due_date: row.get(6)?,
        completed: row.get(7)?,
        completed_at: row.get(8)?,
        position: row.get(9)?,
        is_deleted: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

pub struct Tasks {
    pub conn: Connection,
}

impl Tasks {
    pub fn new() -> Result<Self> {
        let db = Db::new()?;
        Ok(Self { conn: db.conn })
    }

    /// Creates a task with store-side defaults: `status = todo`,
    /// `completed = false`, `position = now` in epoch milliseconds, and a
    /// due date of "today" in the given timezone when unset. A missing
    /// project resolves to the mode's default project, which is created
    /// lazily. The target project's counter moves in the same transaction.
    pub fn create(&mut self, new: NewTask, default_mode: ProjectMode, tz_offset_minutes: i32) -> Result<Task> {
        validate_task_title(&new.title).into_result()?;
        validate_description(&new.description).into_result()?;
        for tag in &new.tags {
            validate_tag(tag, None).into_result()?;
        }

        let now = Utc::now();
        let status = new.status.unwrap_or(TaskStatus::Todo);
        let completed = status == TaskStatus::Completed;
        let completed_at = completed.then_some(now);
        let priority = new.priority.unwrap_or(TaskPriority::Medium);
        let due_date = new.due_date.unwrap_or_else(|| today_utc_range(tz_offset_minutes).0);

        let tx = self.conn.transaction()?;
        let project_id = match new.project_id {
            Some(id) => {
                require_project(&tx, id)?;
                id
            }
            None => default_project_in_tx(&tx, default_mode, now)?,
        };

        tx.execute(
            INSERT_TASK,
            params![
                new.title.trim(),
                new.description,
                status.as_str(),
                priority.as_str(),
                project_id,
                due_date,
                completed,
                completed_at,
                now.timestamp_millis(),
                now
            ],
        )?;
        let id = tx.last_insert_rowid();

        tx.execute(INC_TASK_COUNT, params![project_id, 1])?;
        if completed {
            tx.execute(INC_COMPLETED_COUNT, params![project_id, 1])?;
        }

        for tag in &new.tags {
            link_tag_in_tx(&tx, id, tag)?;
        }

        tx.commit()?;
        self.require(id)
    }

    /// Non-deleted tasks matching the filter, in position order.
    pub fn fetch(&mut self, filter: TaskFilter) -> Result<Vec<Task>> {
        let mut sql = format!("{} WHERE is_deleted = 0", SELECT_TASKS);
        let mut bound: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        match filter {
            TaskFilter::All => {}
            TaskFilter::Today { offset_minutes } => {
                let (start, end) = today_utc_range(offset_minutes);
                sql.push_str(" AND due_date >= ?1 AND due_date < ?2");
                bound.push(Box::new(start));
                bound.push(Box::new(end));
            }
            TaskFilter::ByProject(project_id) => {
                sql.push_str(" AND project_id = ?1");
                bound.push(Box::new(project_id));
            }
            TaskFilter::ByStatus(status) => {
                sql.push_str(" AND status = ?1");
                bound.push(Box::new(status.as_str().to_string()));
            }
            TaskFilter::ByIds(ids) => {
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                let placeholders = (1..=ids.len()).map(|i| format!("?{}", i)).collect::<Vec<_>>().join(", ");
                sql.push_str(&format!(" AND id IN ({})", placeholders));
                for id in ids {
                    bound.push(Box::new(id));
                }
            }
            TaskFilter::ByTag(tag_id) => {
                sql.push_str(" AND id IN (SELECT task_id FROM task_tags WHERE tag_id = ?1)");
                bound.push(Box::new(tag_id));
            }
        }
        sql.push_str(" ORDER BY position");

        let mut stmt = self.conn.prepare(&sql)?;
        let iter = stmt.query_map(rusqlite::params_from_iter(bound.iter().map(|p| p.as_ref())), map_task)?;

        let mut tasks = Vec::new();
        for task in iter {
            tasks.push(task?);
        }
        Ok(tasks)
    }

    pub fn get_by_id(&mut self, id: i64) -> Result<Option<Task>> {
        self.conn
            .query_row(&format!("{} WHERE id = ?1 AND is_deleted = 0", SELECT_TASKS), params![id], map_task)
            .optional()
            .map_err(Into::into)
    }

    fn require(&mut self, id: i64) -> Result<Task> {
        self.get_by_id(id)?
            .ok_or_else(|| ErrorCode::TaskNotFound.with_message(Message::TaskNotFound(id)))
    }

    /// Merges a partial update over the task and keeps project counters in
    /// step: a project move shifts `task_count` (and the completed count if
    /// the task is completed) from the old project to the new one; a
    /// completion toggle adjusts `completed_task_count` on the unchanged
    /// project. All of it commits atomically with the task row.
    pub fn update(&mut self, id: i64, patch: TaskPatch) -> Result<Task> {
        if let Some(title) = &patch.title {
            validate_task_title(title).into_result()?;
        }
        if let Some(description) = &patch.description {
            validate_description(description).into_result()?;
        }

        let now = Utc::now();
        let tx = self.conn.transaction()?;
        let prior = get_in_tx(&tx, id)?.ok_or_else(|| ErrorCode::TaskNotFound.with_message(Message::TaskNotFound(id)))?;

        // Completion and status stay coherent: completed <=> status == completed.
        let (completed, status) = match (patch.completed, patch.status) {
            (Some(true), _) => (true, TaskStatus::Completed),
            (Some(false), Some(s)) if s != TaskStatus::Completed => (false, s),
            (Some(false), _) => (
                false,
                if prior.status == TaskStatus::Completed { TaskStatus::Todo } else { prior.status },
            ),
            (None, Some(TaskStatus::Completed)) => (true, TaskStatus::Completed),
            (None, Some(s)) => (false, s),
            (None, None) => (prior.completed, prior.status),
        };
        let completed_at = match (prior.completed, completed) {
            (false, true) => Some(now),
            (true, false) => None,
            _ => prior.completed_at,
        };

        let project_id = patch.project_id.unwrap_or(prior.project_id);
        if project_id != prior.project_id {
            require_project(&tx, project_id)?;
            tx.execute(INC_TASK_COUNT, params![prior.project_id, -1])?;
            tx.execute(INC_TASK_COUNT, params![project_id, 1])?;
            if prior.completed {
                tx.execute(INC_COMPLETED_COUNT, params![prior.project_id, -1])?;
            }
            if completed {
                tx.execute(INC_COMPLETED_COUNT, params![project_id, 1])?;
            }
        } else if completed != prior.completed {
            tx.execute(INC_COMPLETED_COUNT, params![project_id, if completed { 1 } else { -1 }])?;
        }

        let title = patch.title.map(|t| t.trim().to_string()).unwrap_or(prior.title);
        let description = patch.description.unwrap_or(prior.description);
        let priority = patch.priority.unwrap_or(prior.priority);
        let due_date = patch.due_date.unwrap_or(prior.due_date);

        tx.execute(
            UPDATE_TASK,
            params![
                id,
                title,
                description,
                status.as_str(),
                priority.as_str(),
                project_id,
                due_date,
                completed,
                completed_at,
                now
            ],
        )?;

        tx.commit()?;
        self.require(id)
    }

    pub fn toggle_complete(&mut self, id: i64, completed: bool) -> Result<Task> {
        self.update(
            id,
            TaskPatch {
                completed: Some(completed),
                ..Default::default()
            },
        )
    }

    /// Toggles completion on a batch of tasks in one transaction.
    /// Returns the number of tasks that actually changed state; tasks
    /// already in the requested state are left untouched.
    pub fn bulk_toggle_complete(&mut self, ids: &[i64], completed: bool) -> Result<usize> {
        if ids.is_empty() {
            return Err(ErrorCode::InvalidInput.with_message(Message::NoTaskIdsProvided));
        }

        let now = Utc::now();
        let tx = self.conn.transaction()?;
        let mut changed = 0;

        for &id in ids {
            let prior = get_in_tx(&tx, id)?.ok_or_else(|| ErrorCode::TaskNotFound.with_message(Message::TaskNotFound(id)))?;
            if prior.completed == completed {
                continue;
            }

            let (status, completed_at): (TaskStatus, Option<DateTime<Utc>>) = if completed {
                (TaskStatus::Completed, Some(now))
            } else {
                (TaskStatus::Todo, None)
            };
            tx.execute(
                "UPDATE tasks SET completed = ?2, status = ?3, completed_at = ?4, updated_at = ?5 WHERE id = ?1",
                params![id, completed, status.as_str(), completed_at, now],
            )?;
            tx.execute(INC_COMPLETED_COUNT, params![prior.project_id, if completed { 1 } else { -1 }])?;
            changed += 1;
        }

        tx.commit()?;
        Ok(changed)
    }

    /// Batch position reorder.
    pub fn update_positions(&mut self, positions: &[(i64, i64)]) -> Result<()> {
        let now = Utc::now();
        let tx = self.conn.transaction()?;
        for &(id, position) in positions {
            tx.execute(
                "UPDATE tasks SET position = ?2, updated_at = ?3 WHERE id = ?1 AND is_deleted = 0",
                params![id, position, now],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Soft-deletes a task, rolling its contribution out of the project
    /// counters and tag usage counts. Already-deleted tasks report not-found.
    pub fn delete(&mut self, id: i64) -> Result<()> {
        let now = Utc::now();
        let tx = self.conn.transaction()?;
        let prior = get_in_tx(&tx, id)?.ok_or_else(|| ErrorCode::TaskNotFound.with_message(Message::TaskNotFound(id)))?;

        tx.execute(SOFT_DELETE_TASK, params![id, now])?;
        tx.execute(INC_TASK_COUNT, params![prior.project_id, -1])?;
        if prior.completed {
            tx.execute(INC_COMPLETED_COUNT, params![prior.project_id, -1])?;
        }
        tx.execute(DEC_TAG_USAGE_FOR_TASK, params![id])?;

        tx.commit()?;
        Ok(())
    }

    /// Permanently removes soft-deleted rows. Join rows go with them via
    /// the cascading foreign key.
    pub fn purge_deleted(&mut self) -> Result<usize> {
        let purged = self.conn.execute("DELETE FROM tasks WHERE is_deleted = 1", [])?;
        Ok(purged)
    }
}

fn get_in_tx(tx: &Transaction, id: i64) -> Result<Option<Task>> {
    tx.query_row(&format!("{} WHERE id = ?1 AND is_deleted = 0", SELECT_TASKS), params![id], map_task)
        .optional()
        .map_err(Into::into)
}

fn require_project(tx: &Transaction, id: i64) -> Result<()> {
    let exists: Option<i64> = tx
        .query_row("SELECT id FROM projects WHERE id = ?1 AND is_deleted = 0", params![id], |row| row.get(0))
        .optional()?;
    if exists.is_none() {
        return Err(ErrorCode::ProjectNotFound.with_message(Message::ProjectNotFound(id)));
    }
    Ok(())
}

fn default_project_in_tx(tx: &Transaction, mode: ProjectMode, now: DateTime<Utc>) -> Result<i64> {
    let existing: Option<i64> = tx
        .query_row(
            "SELECT id FROM projects WHERE mode = ?1 AND is_default = 1 AND is_deleted = 0",
            params![mode.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }

    tx.execute(
        "INSERT INTO projects (name, mode, is_default, position, created_at, updated_at) VALUES (?1, ?2, 1, ?3, ?4, ?4)",
        params![DEFAULT_PROJECT_NAME, mode.as_str(), now.timestamp_millis(), now],
    )?;
    Ok(tx.last_insert_rowid())
}

fn link_tag_in_tx(tx: &Transaction, task_id: i64, name: &str) -> Result<()> {
    let tag_id: i64 = match tx
        .query_row("SELECT id FROM tags WHERE name = ?1", params![name], |row| row.get(0))
        .optional()?
    {
        Some(id) => id,
        None => {
            let count: i64 = tx.query_row("SELECT COUNT(*) FROM tags", [], |row| row.get(0))?;
            let color = crate::db::tags::DEFAULT_COLORS[count as usize % crate::db::tags::DEFAULT_COLORS.len()];
            tx.execute(
                "INSERT INTO tags (name, display_name, color) VALUES (?1, ?1, ?2)",
                params![name, color],
            )?;
            tx.last_insert_rowid()
        }
    };

    let linked = tx.execute(
        "INSERT OR IGNORE INTO task_tags (task_id, tag_id) VALUES (?1, ?2)",
        params![task_id, tag_id],
    )?;
    if linked > 0 {
        tx.execute("UPDATE tags SET usage_count = usage_count + 1 WHERE id = ?1", params![tag_id])?;
    }
    Ok(())
}
