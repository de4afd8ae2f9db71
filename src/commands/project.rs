use crate::{
    db::projects::Projects,
    libs::{
        config::Config,
        messages::Message,
        project::{ProjectMode, ProjectPatch},
        view::View,
    },
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct ProjectArgs {
    #[command(subcommand)]
    command: Option<ProjectCommand>,
}

#[derive(Debug, Subcommand)]
enum ProjectCommand {
    /// Create a new project
    Create {
        /// Project name
        name: String,
        /// Mode: personal or professional (defaults to the configured mode)
        #[arg(short, long)]
        mode: Option<String>,
    },
    /// List projects
    List {
        /// Limit to one mode
        #[arg(short, long)]
        mode: Option<String>,
    },
    /// Rename a project
    Rename {
        /// Project ID
        id: i64,
        /// New name
        name: String,
    },
    /// Archive or unarchive a project
    Archive {
        /// Project ID
        id: i64,
        /// Unarchive instead
        #[arg(long)]
        undo: bool,
    },
    /// Soft-delete a project and its tasks
    Delete {
        /// Project ID
        id: i64,
        /// Confirm deletion even with incomplete tasks
        #[arg(long)]
        confirm: bool,
    },
}

pub async fn cmd(args: ProjectArgs) -> Result<()> {
    let config = Config::read()?;
    match args.command {
        Some(ProjectCommand::Create { name, mode }) => handle_create(&config, name, mode),
        Some(ProjectCommand::List { mode }) => handle_list(mode),
        Some(ProjectCommand::Rename { id, name }) => handle_rename(id, name),
        Some(ProjectCommand::Archive { id, undo }) => handle_archive(id, !undo),
        Some(ProjectCommand::Delete { id, confirm }) => handle_delete(id, confirm),
        None => handle_list(None),
    }
}

fn parse_mode(value: &str) -> Result<ProjectMode> {
    ProjectMode::parse(value).ok_or_else(|| anyhow::anyhow!("unknown mode '{}', expected personal|professional", value))
}

fn handle_create(config: &Config, name: String, mode: Option<String>) -> Result<()> {
    let mut projects_db = Projects::new()?;
    let mode = match mode.as_deref() {
        Some(m) => parse_mode(m)?,
        None => config.general.default_mode,
    };

    let project = projects_db.create(&name, mode)?;
    msg_success!(Message::ProjectCreated(project.name));
    Ok(())
}

fn handle_list(mode: Option<String>) -> Result<()> {
    let mut projects_db = Projects::new()?;
    let mode = mode.as_deref().map(parse_mode).transpose()?;
    let projects = projects_db.fetch(mode)?;

    if projects.is_empty() {
        msg_info!(Message::NoProjectsFound);
        return Ok(());
    }

    msg_print!(Message::ProjectListHeader, true);
    View::projects(&projects)?;
    Ok(())
}

fn handle_rename(id: i64, name: String) -> Result<()> {
    let mut projects_db = Projects::new()?;
    let project = projects_db.update(
        id,
        ProjectPatch {
            name: Some(name),
            ..Default::default()
        },
    )?;
    msg_success!(Message::ProjectUpdated(project.name));
    Ok(())
}

fn handle_archive(id: i64, archived: bool) -> Result<()> {
    let mut projects_db = Projects::new()?;
    let project = projects_db.update(
        id,
        ProjectPatch {
            is_archived: Some(archived),
            ..Default::default()
        },
    )?;
    if archived {
        msg_success!(Message::ProjectArchived(project.name));
    } else {
        msg_success!(Message::ProjectUpdated(project.name));
    }
    Ok(())
}

fn handle_delete(id: i64, confirm: bool) -> Result<()> {
    let mut projects_db = Projects::new()?;

    let project = match projects_db.get_by_id(id)? {
        Some(p) => p,
        None => {
            msg_error!(Message::ProjectNotFound(id));
            return Ok(());
        }
    };

    // Surface what deletion would take with it before prompting.
    let check = projects_db.check_deletion(id)?;
    let confirmed = if confirm {
        true
    } else if check.requires_confirmation() {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDeleteProjectWithTasks(project.name.clone(), check.incomplete_count).to_string())
            .default(false)
            .interact()?
    } else {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDeleteProject(project.name.clone()).to_string())
            .default(false)
            .interact()?
    };

    if !confirmed {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    projects_db.delete(id, true)?;
    msg_success!(Message::ProjectDeleted(project.name));
    Ok(())
}
