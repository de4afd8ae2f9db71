use crate::{
    db::{
        tags::{Tag, Tags},
        tasks::Tasks,
    },
    libs::{messages::Message, task::TaskFilter, view::View},
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

#[derive(Debug, Args)]
pub struct TagArgs {
    #[command(subcommand)]
    command: Option<TagCommand>,
}

#[derive(Debug, Subcommand)]
enum TagCommand {
    /// Create a new tag
    Create {
        /// Tag slug (lowercase, a-z 0-9 - _)
        name: String,
        /// Display name (defaults to the slug)
        #[arg(long)]
        display: Option<String>,
        /// Hex color like #3B82F6
        #[arg(short, long)]
        color: Option<String>,
    },
    /// List all tags
    List,
    /// Edit a tag's display name and color
    Edit {
        /// Tag slug or ID
        tag: String,
    },
    /// Delete a tag
    Delete {
        /// Tag slug or ID
        tag: String,
    },
    /// Show tasks carrying a tag
    Tasks {
        /// Tag slug
        tag: String,
    },
}

pub async fn cmd(args: TagArgs) -> Result<()> {
    match args.command {
        Some(TagCommand::Create { name, display, color }) => handle_create(name, display, color),
        Some(TagCommand::List) | None => handle_list(),
        Some(TagCommand::Edit { tag }) => handle_edit(tag),
        Some(TagCommand::Delete { tag }) => handle_delete(tag),
        Some(TagCommand::Tasks { tag }) => handle_show_tasks(tag),
    }
}

fn find_tag(tags_db: &mut Tags, identifier: &str) -> Result<Option<Tag>> {
    if let Ok(id) = identifier.parse::<i64>() {
        tags_db.get_by_id(id)
    } else {
        tags_db.get_by_name(identifier)
    }
}

fn handle_create(name: String, display: Option<String>, color: Option<String>) -> Result<()> {
    let mut tags_db = Tags::new()?;

    if tags_db.get_by_name(&name)?.is_some() {
        msg_error!(Message::TagAlreadyExists(name));
        return Ok(());
    }

    let tag = Tag::new(name.clone(), display.unwrap_or_else(|| name.clone()), color);
    tags_db.create(&tag)?;

    msg_success!(Message::TagCreated(name));
    Ok(())
}

fn handle_list() -> Result<()> {
    let mut tags_db = Tags::new()?;
    let tags = tags_db.list()?;

    if tags.is_empty() {
        msg_info!(Message::NoTagsFound);
        return Ok(());
    }

    msg_print!(Message::TagListHeader, true);
    View::tags(&tags)?;
    Ok(())
}

fn handle_edit(identifier: String) -> Result<()> {
    let mut tags_db = Tags::new()?;

    let tag = match find_tag(&mut tags_db, &identifier)? {
        Some(t) => t,
        None => {
            msg_error!(Message::TagNotFound(identifier));
            return Ok(());
        }
    };

    let new_display: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptTagName.to_string())
        .default(tag.display_name.clone())
        .interact_text()?;

    let new_color: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptTagColor.to_string())
        .default(tag.color.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    let color = if new_color.is_empty() { None } else { Some(new_color.as_str()) };
    tags_db.update(tag.id.unwrap_or_default(), &new_display, color)?;
    msg_success!(Message::TagUpdated(tag.name));
    Ok(())
}

fn handle_delete(identifier: String) -> Result<()> {
    let mut tags_db = Tags::new()?;

    let tag = match find_tag(&mut tags_db, &identifier)? {
        Some(t) => t,
        None => {
            msg_error!(Message::TagNotFound(identifier));
            return Ok(());
        }
    };

    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Delete tag '{}' (used by {} task(s))?", tag.name, tag.usage_count))
        .default(false)
        .interact()?;

    if confirmed {
        tags_db.delete(tag.id.unwrap_or_default())?;
        msg_success!(Message::TagDeleted(tag.name));
    } else {
        msg_info!(Message::OperationCancelled);
    }

    Ok(())
}

fn handle_show_tasks(tag_name: String) -> Result<()> {
    let mut tags_db = Tags::new()?;

    let tag = match tags_db.get_by_name(&tag_name)? {
        Some(t) => t,
        None => {
            msg_error!(Message::TagNotFound(tag_name));
            return Ok(());
        }
    };

    let task_ids = tags_db.tasks_with_tag(tag.id.unwrap_or_default())?;
    if task_ids.is_empty() {
        msg_info!(Message::NoTasksWithTag(tag_name));
        return Ok(());
    }

    let tasks = Tasks::new()?.fetch(TaskFilter::ByIds(task_ids))?;
    msg_print!(Message::TasksWithTag(tag_name), true);
    View::tasks(&tasks)?;

    Ok(())
}
