use crate::{
    db::{projects::Projects, tags::Tags, tasks::Tasks},
    libs::{
        config::Config,
        messages::Message,
        task::{today_local_string, NewTask, TaskFilter, TaskPatch, TaskPriority, TaskStatus},
        view::View,
    },
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

#[derive(Debug, Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    command: Option<TaskCommand>,
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    /// Create a new task
    Create {
        /// Task title
        title: String,
        /// Longer description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Project ID (defaults to the mode's Inbox)
        #[arg(short, long)]
        project: Option<i64>,
        /// Priority: low, medium, high
        #[arg(long)]
        priority: Option<String>,
        /// Due date as YYYY-MM-DD in the configured timezone
        #[arg(long)]
        due: Option<String>,
        /// Tag slugs to attach
        #[arg(short, long)]
        tag: Vec<String>,
    },
    /// List tasks
    List {
        /// Only tasks due today
        #[arg(long)]
        today: bool,
        /// Only tasks in a project
        #[arg(short, long)]
        project: Option<i64>,
        /// Only tasks with a status: todo, in_progress, completed
        #[arg(long)]
        status: Option<String>,
        /// Only tasks carrying a tag slug
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Edit a task's fields
    Edit {
        /// Task ID
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        /// New status: todo, in_progress, completed
        #[arg(long)]
        status: Option<String>,
        /// New due date as YYYY-MM-DD; "none" clears it
        #[arg(long)]
        due: Option<String>,
    },
    /// Mark tasks completed (or reopen them with --undo)
    Complete {
        /// Task IDs
        #[arg(required = true)]
        ids: Vec<i64>,
        /// Reopen instead of completing
        #[arg(long)]
        undo: bool,
    },
    /// Move a task to another project
    Move {
        /// Task ID
        id: i64,
        /// Target project ID
        project: i64,
    },
    /// Soft-delete a task
    Delete {
        /// Task ID
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Permanently remove soft-deleted tasks
    Purge,
}

pub async fn cmd(args: TaskArgs) -> Result<()> {
    let config = Config::read()?;
    match args.command {
        Some(TaskCommand::Create {
            title,
            description,
            project,
            priority,
            due,
            tag,
        }) => handle_create(&config, title, description, project, priority, due, tag),
        Some(TaskCommand::List {
            today,
            project,
            status,
            tag,
        }) => handle_list(&config, today, project, status, tag),
        Some(TaskCommand::Edit {
            id,
            title,
            description,
            priority,
            status,
            due,
        }) => handle_edit(&config, id, title, description, priority, status, due),
        Some(TaskCommand::Complete { ids, undo }) => handle_complete(ids, !undo),
        Some(TaskCommand::Move { id, project }) => handle_move(id, project),
        Some(TaskCommand::Delete { id, yes }) => handle_delete(id, yes),
        Some(TaskCommand::Purge) => handle_purge(),
        None => handle_interactive(&config),
    }
}

fn parse_due(value: &str, offset_minutes: i32) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")?;
    let offset = FixedOffset::east_opt(offset_minutes * 60).unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
    let midnight = date.and_hms_opt(0, 0, 0).unwrap();
    Ok(midnight.and_local_timezone(offset).unwrap().with_timezone(&Utc))
}

fn parse_priority(value: &str) -> Result<TaskPriority> {
    TaskPriority::parse(value).ok_or_else(|| anyhow::anyhow!("unknown priority '{}', expected low|medium|high", value))
}

fn parse_status(value: &str) -> Result<TaskStatus> {
    TaskStatus::parse(value).ok_or_else(|| anyhow::anyhow!("unknown status '{}', expected todo|in_progress|completed", value))
}

#[allow(clippy::too_many_arguments)]
fn handle_create(
    config: &Config,
    title: String,
    description: String,
    project: Option<i64>,
    priority: Option<String>,
    due: Option<String>,
    tags: Vec<String>,
) -> Result<()> {
    let mut tasks_db = Tasks::new()?;

    let new = NewTask {
        title: title.clone(),
        description,
        status: None,
        priority: priority.as_deref().map(parse_priority).transpose()?,
        project_id: project,
        due_date: due
            .as_deref()
            .map(|d| parse_due(d, config.general.timezone_offset_minutes))
            .transpose()?,
        tags,
    };
    tasks_db.create(new, config.general.default_mode, config.general.timezone_offset_minutes)?;

    msg_success!(Message::TaskCreated(title));
    Ok(())
}

fn handle_list(config: &Config, today: bool, project: Option<i64>, status: Option<String>, tag: Option<String>) -> Result<()> {
    let mut tasks_db = Tasks::new()?;

    let filter = if today {
        TaskFilter::Today {
            offset_minutes: config.general.timezone_offset_minutes,
        }
    } else if let Some(project_id) = project {
        TaskFilter::ByProject(project_id)
    } else if let Some(status) = status {
        TaskFilter::ByStatus(parse_status(&status)?)
    } else if let Some(tag_name) = tag {
        let mut tags_db = Tags::new()?;
        match tags_db.get_by_name(&tag_name)? {
            Some(tag) => TaskFilter::ByTag(tag.id.unwrap_or_default()),
            None => {
                msg_error!(Message::TagNotFound(tag_name));
                return Ok(());
            }
        }
    } else {
        TaskFilter::All
    };

    let tasks = tasks_db.fetch(filter)?;
    if tasks.is_empty() {
        msg_info!(Message::NoTasksFound);
        return Ok(());
    }

    if today {
        msg_print!(
            Message::TodayTasksHeader(today_local_string(config.general.timezone_offset_minutes)),
            true
        );
    } else {
        msg_print!(Message::TasksHeader, true);
    }
    View::tasks(&tasks)?;
    Ok(())
}

fn handle_edit(
    config: &Config,
    id: i64,
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    status: Option<String>,
    due: Option<String>,
) -> Result<()> {
    let mut tasks_db = Tasks::new()?;

    let due_date = match due.as_deref() {
        None => None,
        Some("none") => Some(None),
        Some(d) => Some(Some(parse_due(d, config.general.timezone_offset_minutes)?)),
    };
    let patch = TaskPatch {
        title,
        description,
        status: status.as_deref().map(parse_status).transpose()?,
        priority: priority.as_deref().map(parse_priority).transpose()?,
        project_id: None,
        due_date,
        completed: None,
    };
    if patch.is_empty() {
        msg_info!(Message::Custom("Nothing to change".to_string()));
        return Ok(());
    }

    let task = tasks_db.update(id, patch)?;
    msg_success!(Message::TaskUpdated(task.title));
    Ok(())
}

fn handle_complete(ids: Vec<i64>, completed: bool) -> Result<()> {
    let mut tasks_db = Tasks::new()?;

    if ids.len() == 1 {
        let task = tasks_db.toggle_complete(ids[0], completed)?;
        if completed {
            msg_success!(Message::TaskCompleted(task.title));
        } else {
            msg_success!(Message::TaskReopened(task.title));
        }
    } else {
        let changed = tasks_db.bulk_toggle_complete(&ids, completed)?;
        msg_success!(Message::TasksToggled(changed));
    }
    Ok(())
}

fn handle_move(id: i64, project_id: i64) -> Result<()> {
    let mut tasks_db = Tasks::new()?;
    let mut projects_db = Projects::new()?;

    let project = match projects_db.get_by_id(project_id)? {
        Some(p) => p,
        None => {
            msg_error!(Message::ProjectNotFound(project_id));
            return Ok(());
        }
    };

    let task = tasks_db.update(
        id,
        TaskPatch {
            project_id: Some(project_id),
            ..Default::default()
        },
    )?;
    msg_success!(Message::TaskMoved(task.title, project.name));
    Ok(())
}

fn handle_delete(id: i64, yes: bool) -> Result<()> {
    let mut tasks_db = Tasks::new()?;

    let task = match tasks_db.get_by_id(id)? {
        Some(t) => t,
        None => {
            msg_error!(Message::TaskNotFound(id));
            return Ok(());
        }
    };

    let confirmed = yes
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDeleteTask(task.title.clone()).to_string())
            .default(false)
            .interact()?;

    if confirmed {
        tasks_db.delete(id)?;
        msg_success!(Message::TaskDeleted(task.title));
    } else {
        msg_info!(Message::OperationCancelled);
    }
    Ok(())
}

fn handle_purge() -> Result<()> {
    let mut tasks_db = Tasks::new()?;
    let purged = tasks_db.purge_deleted()?;
    msg_success!(Message::PurgedDeletedRows(purged));
    Ok(())
}

fn handle_interactive(config: &Config) -> Result<()> {
    let title: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptTaskTitle.to_string())
        .interact_text()?;
    let description: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptTaskDescription.to_string())
        .allow_empty(true)
        .interact_text()?;

    handle_create(config, title, description, None, None, None, Vec::new())
}
