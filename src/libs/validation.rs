//! Field validation utilities.
//!
//! Pure functions with no state and no side effects, run before any write.
//! A failing validation never touches the database; composite validators
//! return a structured [`ValidationResult`] listing every failing field.

use thiserror::Error;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_PROJECT_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 2000;
pub const MAX_TAG_NAME_LEN: usize = 50;

/// Stable error codes surfaced to callers alongside human-readable messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorCode {
    #[error("INVALID_INPUT")]
    InvalidInput,
    #[error("MISSING_REQUIRED_FIELD")]
    MissingRequiredField,
    #[error("DATABASE_ERROR")]
    DatabaseError,
    #[error("TASK_NOT_FOUND")]
    TaskNotFound,
    #[error("PROJECT_NOT_FOUND")]
    ProjectNotFound,
    #[error("TAG_NOT_FOUND")]
    TagNotFound,
    #[error("CONFIRMATION_REQUIRED")]
    ConfirmationRequired,
    #[error("DEFAULT_PROJECT_IMMUTABLE")]
    DefaultProjectImmutable,
    #[error("PROJECT_LIMIT_REACHED")]
    ProjectLimitReached,
}

impl ErrorCode {
    /// Wraps the code in an `anyhow::Error` with a user-facing message.
    /// The code stays downcastable through the context chain.
    pub fn with_message(self, msg: crate::libs::messages::Message) -> anyhow::Error {
        anyhow::Error::new(self).context(format!("❌ {}", msg))
    }
}

#[derive(Debug, Clone)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<FieldError>,
    /// Code of the first failing check, `None` when valid.
    pub code: Option<ErrorCode>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            code: None,
        }
    }

    /// Converts a failed validation into an error carrying the first
    /// failing code; `Ok(())` when valid.
    pub fn into_result(self) -> anyhow::Result<()> {
        if self.is_valid {
            return Ok(());
        }
        let code = self.code.unwrap_or(ErrorCode::InvalidInput);
        let detail = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        Err(code.with_message(crate::libs::messages::Message::ValidationFailed(detail)))
    }

    fn fail(&mut self, code: ErrorCode, field: &'static str, message: impl Into<String>) {
        self.is_valid = false;
        self.code.get_or_insert(code);
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }
}

/// Checks a `#RRGGBB` hex color.
pub fn is_valid_hex_color(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Tag names are lowercase slugs: `[a-z0-9_-]`, 1 to 50 chars.
pub fn is_valid_tag_name(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_TAG_NAME_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

/// Minimal structural email check: one `@` with a dotted, non-empty domain.
pub fn is_valid_email(value: &str) -> bool {
    let mut parts = value.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || value.contains(' ') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2,
        None => false,
    }
}

/// 24-hour `HH:MM` time of day.
pub fn is_valid_time_of_day(value: &str) -> bool {
    let Some((h, m)) = value.split_once(':') else {
        return false;
    };
    if h.len() != 2 || m.len() != 2 {
        return false;
    }
    let (Ok(hours), Ok(minutes)) = (h.parse::<u32>(), m.parse::<u32>()) else {
        return false;
    };
    hours < 24 && minutes < 60
}

pub fn validate_task_title(title: &str) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let trimmed = title.trim();
    if trimmed.is_empty() {
        result.fail(ErrorCode::MissingRequiredField, "title", "Title is required");
    } else if trimmed.chars().count() > MAX_TITLE_LEN {
        result.fail(
            ErrorCode::InvalidInput,
            "title",
            format!("Title must be at most {} characters", MAX_TITLE_LEN),
        );
    }
    result
}

pub fn validate_description(description: &str) -> ValidationResult {
    let mut result = ValidationResult::ok();
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        result.fail(
            ErrorCode::InvalidInput,
            "description",
            format!("Description must be at most {} characters", MAX_DESCRIPTION_LEN),
        );
    }
    result
}

pub fn validate_project_name(name: &str) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let trimmed = name.trim();
    if trimmed.is_empty() {
        result.fail(ErrorCode::MissingRequiredField, "name", "Project name is required");
    } else if trimmed.chars().count() > MAX_PROJECT_NAME_LEN {
        result.fail(
            ErrorCode::InvalidInput,
            "name",
            format!("Project name must be at most {} characters", MAX_PROJECT_NAME_LEN),
        );
    }
    result
}

pub fn validate_tag(name: &str, color: Option<&str>) -> ValidationResult {
    let mut result = ValidationResult::ok();
    if name.is_empty() {
        result.fail(ErrorCode::MissingRequiredField, "name", "Tag name is required");
    } else if !is_valid_tag_name(name) {
        result.fail(
            ErrorCode::InvalidInput,
            "name",
            "Tag names are lowercase slugs (a-z, 0-9, '-', '_')",
        );
    }
    if let Some(color) = color {
        if !is_valid_hex_color(color) {
            result.fail(ErrorCode::InvalidInput, "color", "Color must be a #RRGGBB hex value");
        }
    }
    result
}
