//! Project domain model.
//!
//! Projects carry two denormalized counters, `task_count` and
//! `completed_task_count`. The invariant is that both equal the counts over
//! non-deleted member tasks, with `completed_task_count <= task_count`.
//! The counters are adjusted inside the same transaction as every task
//! mutation and re-derived from task rows by the sync reconciler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-default projects allowed per mode before `create` refuses.
pub const MAX_PROJECTS_PER_MODE: i64 = 10;

/// Name given to the lazily created default project of each mode.
pub const DEFAULT_PROJECT_NAME: &str = "Inbox";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectMode {
    Personal,
    Professional,
}

impl ProjectMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectMode::Personal => "personal",
            ProjectMode::Professional => "professional",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "personal" => Some(ProjectMode::Personal),
            "professional" => Some(ProjectMode::Professional),
            _ => None,
        }
    }
}

impl fmt::Display for ProjectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Option<i64>,
    pub name: String,
    pub mode: ProjectMode,
    pub task_count: i64,
    pub completed_task_count: i64,
    pub is_default: bool,
    pub is_archived: bool,
    pub is_deleted: bool,
    pub position: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial update merged over an existing project.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub is_archived: Option<bool>,
    pub position: Option<i64>,
}

/// Classification of a project's live tasks, used to warn the caller
/// before deletion.
#[derive(Debug, Clone, Copy)]
pub struct DeletionCheck {
    pub task_count: i64,
    pub completed_count: i64,
    pub incomplete_count: i64,
}

impl DeletionCheck {
    /// Deleting a project with incomplete tasks loses work, so it needs
    /// an explicit confirmation from the caller.
    pub fn requires_confirmation(&self) -> bool {
        self.incomplete_count > 0
    }
}
