//! Snapshot export of tasks and projects.
//!
//! Writes the current non-deleted data to CSV or JSON. CSV flattens each
//! task into one record; JSON keeps the full structures, pretty-printed.

use crate::db::projects::Projects;
use crate::db::tags::Tags;
use crate::db::tasks::Tasks;
use crate::libs::messages::Message;
use crate::libs::task::TaskFilter;
use crate::msg_success;
use anyhow::Result;
use chrono::Local;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

/// One flattened task row for CSV output.
#[derive(Debug, Serialize)]
struct ExportTask {
    id: i64,
    title: String,
    description: String,
    status: String,
    priority: String,
    project: String,
    tags: String,
    due_date: String,
    completed: bool,
    position: i64,
}

pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
}

impl Exporter {
    pub fn new(format: ExportFormat, output_path: Option<PathBuf>) -> Self {
        let default_name = format!("taskflow_export_{}", Local::now().format("%Y%m%d_%H%M%S"));
        let extension = match format {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        };
        let output_path = output_path.unwrap_or_else(|| PathBuf::from(format!("{}.{}", default_name, extension)));

        Self { format, output_path }
    }

    /// Exports every non-deleted task with its project and tag names.
    pub fn export_tasks(&self) -> Result<()> {
        let mut tasks_db = Tasks::new()?;
        let mut projects_db = Projects::new()?;
        let mut tags_db = Tags::new()?;

        let tasks = tasks_db.fetch(TaskFilter::All)?;
        let project_names: HashMap<i64, String> = projects_db
            .fetch(None)?
            .into_iter()
            .filter_map(|p| p.id.map(|id| (id, p.name)))
            .collect();

        let mut rows = Vec::with_capacity(tasks.len());
        for task in &tasks {
            let id = task.id.unwrap_or(0);
            let tag_names = tags_db
                .get_task_tags(id)?
                .into_iter()
                .map(|t| t.name)
                .collect::<Vec<_>>()
                .join(",");
            rows.push(ExportTask {
                id,
                title: task.title.clone(),
                description: task.description.clone(),
                status: task.status.to_string(),
                priority: task.priority.to_string(),
                project: project_names.get(&task.project_id).cloned().unwrap_or_default(),
                tags: tag_names,
                due_date: task.due_date.map(|d| d.to_rfc3339()).unwrap_or_default(),
                completed: task.completed,
                position: task.position,
            });
        }

        match self.format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_path(&self.output_path)?;
                for row in &rows {
                    wtr.serialize(row)?;
                }
                wtr.flush()?;
            }
            ExportFormat::Json => {
                let json = serde_json::to_string_pretty(&rows)?;
                fs::write(&self.output_path, json)?;
            }
        }

        msg_success!(Message::ExportCompleted(self.output_path.display().to_string()));
        Ok(())
    }

    /// Exports the project list with counter values.
    pub fn export_projects(&self) -> Result<()> {
        let mut projects_db = Projects::new()?;
        let projects = projects_db.fetch(None)?;

        match self.format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_path(&self.output_path)?;
                wtr.write_record(["id", "name", "mode", "task_count", "completed_task_count", "is_default", "is_archived"])?;
                for p in &projects {
                    wtr.write_record([
                        p.id.unwrap_or(0).to_string(),
                        p.name.clone(),
                        p.mode.to_string(),
                        p.task_count.to_string(),
                        p.completed_task_count.to_string(),
                        p.is_default.to_string(),
                        p.is_archived.to_string(),
                    ])?;
                }
                wtr.flush()?;
            }
            ExportFormat::Json => {
                let json = serde_json::to_string_pretty(&projects)?;
                fs::write(&self.output_path, json)?;
            }
        }

        msg_success!(Message::ExportCompleted(self.output_path.display().to_string()));
        Ok(())
    }
}
