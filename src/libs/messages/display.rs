//! Display implementation for taskflow application messages.
//!
//! Central location for all user-facing message text. Keeping the strings in
//! one place makes the wording consistent across commands and leaves room
//! for localization later.

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            // === TASK MESSAGES ===
            Message::TaskCreated(title) => format!("Task '{}' created", title),
            Message::TaskUpdated(title) => format!("Task '{}' updated", title),
            Message::TaskDeleted(title) => format!("Task '{}' deleted", title),
            Message::TaskCompleted(title) => format!("Task '{}' completed", title),
            Message::TaskReopened(title) => format!("Task '{}' reopened", title),
            Message::TaskNotFound(id) => format!("Task {} not found", id),
            Message::TasksToggled(count) => format!("{} task(s) updated", count),
            Message::TasksHeader => "📋 Tasks".to_string(),
            Message::TodayTasksHeader(date) => format!("📋 Tasks for {}", date),
            Message::NoTasksFound => "No tasks found".to_string(),
            Message::NoTaskIdsProvided => "No task IDs provided".to_string(),
            Message::TaskMoved(title, project) => format!("Task '{}' moved to '{}'", title, project),
            Message::ConfirmDeleteTask(title) => format!("Delete task '{}'?", title),
            Message::PromptTaskTitle => "Task title".to_string(),
            Message::PromptTaskDescription => "Description".to_string(),

            // === PROJECT MESSAGES ===
            Message::ProjectCreated(name) => format!("Project '{}' created", name),
            Message::ProjectUpdated(name) => format!("Project '{}' updated", name),
            Message::ProjectDeleted(name) => format!("Project '{}' deleted", name),
            Message::ProjectArchived(name) => format!("Project '{}' archived", name),
            Message::ProjectNotFound(id) => format!("Project {} not found", id),
            Message::ProjectListHeader => "📁 Projects".to_string(),
            Message::NoProjectsFound => "No projects found".to_string(),
            Message::DefaultProjectImmutable => "The default project cannot be renamed or deleted".to_string(),
            Message::ProjectLimitReached(limit) => format!("Project limit reached ({} per mode)", limit),
            Message::ProjectHasIncompleteTasks(name, count) => {
                format!("Project '{}' has {} incomplete task(s)", name, count)
            }
            Message::ConfirmDeleteProject(name) => format!("Delete project '{}'?", name),
            Message::ConfirmDeleteProjectWithTasks(name, count) => {
                format!("Delete project '{}' and its {} incomplete task(s)?", name, count)
            }
            Message::PromptProjectName => "Project name".to_string(),
            Message::SelectProjectMode => "Project mode".to_string(),

            // === TAG MESSAGES ===
            Message::TagCreated(name) => format!("Tag '{}' created", name),
            Message::TagUpdated(name) => format!("Tag '{}' updated", name),
            Message::TagDeleted(name) => format!("Tag '{}' deleted", name),
            Message::TagNotFound(name) => format!("Tag '{}' not found", name),
            Message::TagAlreadyExists(name) => format!("Tag '{}' already exists", name),
            Message::TagListHeader => "🏷️ Tags".to_string(),
            Message::NoTagsFound => "No tags found".to_string(),
            Message::NoTasksWithTag(name) => format!("No tasks with tag '{}'", name),
            Message::TasksWithTag(name) => format!("Tasks tagged '{}'", name),
            Message::PromptTagName => "Tag name".to_string(),
            Message::PromptTagColor => "Tag color (#RRGGBB, empty for default)".to_string(),

            // === SYNC MESSAGES ===
            Message::SyncStarted => "Background sync started".to_string(),
            Message::SyncAlreadyRunning => "A sync cycle is already running".to_string(),
            Message::SyncStopped => "Background sync stopped".to_string(),
            Message::SyncCompleted(projects, tags) => {
                format!("Sync complete: {} project(s) and {} tag(s) repaired", projects, tags)
            }
            Message::SyncNothingToRepair => "Sync complete: counters already consistent".to_string(),
            Message::SyncFailed(err) => format!("Sync failed: {}", err),
            Message::LastSyncTime(ts) => format!("Last sync: {}", ts),
            Message::NeverSynced => "No sync has run yet".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved".to_string(),
            Message::ConfigFileNotFound => "Configuration file not found, using defaults".to_string(),
            Message::ConfigParseError => "Failed to parse configuration".to_string(),
            Message::PromptSyncInterval => "Sync interval in seconds".to_string(),
            Message::PromptTimezoneOffset => "Timezone offset in minutes east of UTC".to_string(),
            Message::PromptDefaultMode => "Default project mode".to_string(),

            // === EXPORT MESSAGES ===
            Message::ExportCompleted(path) => format!("Export completed: {}", path),
            Message::ExportFailed(err) => format!("Export failed: {}", err),
            Message::ExportNothingToExport => "Nothing to export".to_string(),

            // === VALIDATION / GENERIC MESSAGES ===
            Message::ValidationFailed(detail) => format!("Validation failed: {}", detail),
            Message::ConfirmationRequired => "Confirmation required: re-run with --confirm".to_string(),
            Message::OperationCancelled => "Operation cancelled".to_string(),
            Message::PurgedDeletedRows(count) => format!("Purged {} soft-deleted row(s)", count),
            Message::MigrationsApplied(count) => format!("Applied {} migration(s)", count),
            Message::Custom(text) => text.clone(),
        };
        write!(f, "{}", text)
    }
}
