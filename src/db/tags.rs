//! Tag store.
//!
//! Tags are lowercase slugs with a display name, a hex color, and a
//! denormalized `usage_count` equal to the number of non-deleted tasks
//! carrying the tag. Task links live in the `task_tags` junction table.

use crate::db::db::Db;
use crate::libs::messages::Message;
use crate::libs::validation::{is_valid_hex_color, validate_tag, ErrorCode};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const SELECT_TAGS: &str = "SELECT id, name, display_name, color, usage_count, created_at FROM tags";
const INSERT_TAG: &str = "INSERT INTO tags (name, display_name, color) VALUES (?1, ?2, ?3)";
const UPDATE_TAG: &str = "UPDATE tags SET display_name = ?2, color = ?3 WHERE id = ?1";
const DELETE_TAG: &str = "DELETE FROM tags WHERE id = ?1";
const SELECT_TASKS_BY_TAG: &str = "SELECT tt.task_id FROM task_tags tt
    JOIN tasks t ON t.id = tt.task_id WHERE tt.tag_id = ?1 AND t.is_deleted = 0";

/// Colors cycled through when a tag is created without an explicit one.
pub(crate) const DEFAULT_COLORS: &[&str] = &["#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#06B6D4", "#F97316"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: Option<i64>,
    pub name: String,
    pub display_name: String,
    pub color: Option<String>,
    pub usage_count: i64,
    pub created_at: Option<DateTime<Utc>>,
}

impl Tag {
    pub fn new(name: String, display_name: String, color: Option<String>) -> Self {
        Self {
            id: None,
            name,
            display_name,
            color,
            usage_count: 0,
            created_at: None,
        }
    }
}

fn map_tag(row: &Row) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get(0)?,
        name: row.get(1)?,
        display_name: row.get(2)?,
        color: row.get(3)?,
        usage_count: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub struct Tags {
    pub conn: Connection,
}

impl Tags {
    pub fn new() -> Result<Self> {
        let db = Db::new()?;
        Ok(Self { conn: db.conn })
    }

    /// Creates a tag after validating the slug and color.
    pub fn create(&mut self, tag: &Tag) -> Result<i64> {
        validate_tag(&tag.name, tag.color.as_deref()).into_result()?;
        self.conn.execute(INSERT_TAG, params![tag.name, tag.display_name, tag.color])?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Updates display name and color; the slug is the tag's identity and
    /// does not change.
    pub fn update(&mut self, id: i64, display_name: &str, color: Option<&str>) -> Result<()> {
        if let Some(color) = color {
            if !is_valid_hex_color(color) {
                return Err(ErrorCode::InvalidInput
                    .with_message(Message::ValidationFailed("color must be a #RRGGBB hex value".to_string())));
            }
        }
        let affected = self.conn.execute(UPDATE_TAG, params![id, display_name, color])?;
        if affected == 0 {
            return Err(ErrorCode::TagNotFound.with_message(Message::TagNotFound(id.to_string())));
        }
        Ok(())
    }

    /// Deletes a tag. Join rows cascade away with it.
    pub fn delete(&mut self, id: i64) -> Result<()> {
        let affected = self.conn.execute(DELETE_TAG, params![id])?;
        if affected == 0 {
            return Err(ErrorCode::TagNotFound.with_message(Message::TagNotFound(id.to_string())));
        }
        Ok(())
    }

    pub fn list(&mut self) -> Result<Vec<Tag>> {
        let mut stmt = self.conn.prepare(&format!("{} ORDER BY name", SELECT_TAGS))?;
        let iter = stmt.query_map([], map_tag)?;

        let mut tags = Vec::new();
        for tag in iter {
            tags.push(tag?);
        }
        Ok(tags)
    }

    pub fn get_by_name(&mut self, name: &str) -> Result<Option<Tag>> {
        self.conn
            .query_row(&format!("{} WHERE name = ?1", SELECT_TAGS), params![name], map_tag)
            .optional()
            .map_err(Into::into)
    }

    pub fn get_by_id(&mut self, id: i64) -> Result<Option<Tag>> {
        self.conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_TAGS), params![id], map_tag)
            .optional()
            .map_err(Into::into)
    }

    /// Tags linked to a task, in name order.
    pub fn get_task_tags(&mut self, task_id: i64) -> Result<Vec<Tag>> {
        let sql = "SELECT t.id, t.name, t.display_name, t.color, t.usage_count, t.created_at FROM tags t
             JOIN task_tags tt ON t.id = tt.tag_id WHERE tt.task_id = ?1 ORDER BY t.name";
        let mut stmt = self.conn.prepare(sql)?;
        let iter = stmt.query_map(params![task_id], map_tag)?;

        let mut tags = Vec::new();
        for tag in iter {
            tags.push(tag?);
        }
        Ok(tags)
    }

    /// IDs of non-deleted tasks carrying the tag.
    pub fn tasks_with_tag(&mut self, tag_id: i64) -> Result<Vec<i64>> {
        let mut stmt = self.conn.prepare(SELECT_TASKS_BY_TAG)?;
        let iter = stmt.query_map(params![tag_id], |row| row.get(0))?;

        let mut task_ids = Vec::new();
        for task_id in iter {
            task_ids.push(task_id?);
        }
        Ok(task_ids)
    }

    /// Replaces a task's tag links and adjusts usage counts, all in one
    /// transaction.
    pub fn set_task_tags(&mut self, task_id: i64, tag_ids: &[i64]) -> Result<()> {
        let tx = self.conn.transaction()?;

        let mut stmt = tx.prepare("SELECT tag_id FROM task_tags WHERE task_id = ?1")?;
        let old_ids: Vec<i64> = stmt.query_map(params![task_id], |row| row.get(0))?.collect::<rusqlite::Result<_>>()?;
        drop(stmt);

        for old_id in &old_ids {
            if !tag_ids.contains(old_id) {
                tx.execute("DELETE FROM task_tags WHERE task_id = ?1 AND tag_id = ?2", params![task_id, old_id])?;
                tx.execute("UPDATE tags SET usage_count = usage_count - 1 WHERE id = ?1", params![old_id])?;
            }
        }
        for tag_id in tag_ids {
            if !old_ids.contains(tag_id) {
                tx.execute("INSERT OR IGNORE INTO task_tags (task_id, tag_id) VALUES (?1, ?2)", params![task_id, tag_id])?;
                tx.execute("UPDATE tags SET usage_count = usage_count + 1 WHERE id = ?1", params![tag_id])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Resolves slug names to tag IDs, creating missing tags with a
    /// rotating default color.
    pub fn get_or_create(&mut self, names: &[String]) -> Result<Vec<i64>> {
        let mut tag_ids = Vec::new();

        for name in names {
            validate_tag(name, None).into_result()?;
            let id = match self.get_by_name(name)? {
                Some(tag) => tag.id.unwrap_or_default(),
                None => {
                    let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM tags", [], |row| row.get(0))?;
                    let color = DEFAULT_COLORS[count as usize % DEFAULT_COLORS.len()];
                    self.conn
                        .execute(INSERT_TAG, params![name, name, color])?;
                    self.conn.last_insert_rowid()
                }
            };
            tag_ids.push(id);
        }

        Ok(tag_ids)
    }
}
