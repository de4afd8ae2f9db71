use super::project::Project;
use super::task::Task;
use crate::db::tags::Tag;
use anyhow::Result;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn tasks(tasks: &[Task]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "STATUS", "PRIORITY", "PROJECT", "DUE"]);
        for task in tasks {
            table.add_row(row![
                task.id.unwrap_or(0),
                task.title,
                task.status,
                task.priority,
                task.project_id,
                task.due_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn projects(projects: &[Project]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "MODE", "TASKS", "DONE", "DEFAULT", "ARCHIVED"]);
        for project in projects {
            table.add_row(row![
                project.id.unwrap_or(0),
                project.name,
                project.mode,
                project.task_count,
                project.completed_task_count,
                if project.is_default { "yes" } else { "" },
                if project.is_archived { "yes" } else { "" }
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn tags(tags: &[Tag]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "DISPLAY", "COLOR", "USED BY"]);
        for tag in tags {
            table.add_row(row![
                tag.id.unwrap_or(0),
                tag.name,
                tag.display_name,
                tag.color.clone().unwrap_or_default(),
                tag.usage_count
            ]);
        }
        table.printstd();

        Ok(())
    }
}
