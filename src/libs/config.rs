//! Configuration management for the taskflow application.
//!
//! Settings live as pretty-printed JSON in the platform application data
//! directory (see [`DataStorage`]). Reading a missing file yields defaults
//! so the application runs without any setup; `taskflow init` offers an
//! interactive wizard that pre-fills current values.
//!
//! Two sections exist:
//! - `general`: the default project mode used when a task is created
//!   without a project, and the timezone offset (minutes east of UTC) used
//!   for "today" due-date filtering.
//! - `sync`: the background reconciliation interval in seconds.

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::libs::project::ProjectMode;
use anyhow::Result;
use chrono::{Local, Offset};
use dialoguer::{theme::ColorfulTheme, Input, Select};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Default seconds between background reconciliation cycles.
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 30;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GeneralConfig {
    /// Mode whose default project receives tasks created without an
    /// explicit project.
    pub default_mode: ProjectMode,
    /// Minutes east of UTC; applied when resolving "today" for due-date
    /// defaults and the Today filter.
    pub timezone_offset_minutes: i32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_mode: ProjectMode::Personal,
            timezone_offset_minutes: local_offset_minutes(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SyncConfig {
    pub interval_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_SYNC_INTERVAL_SECS,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

impl Config {
    /// Loads the configuration, falling back to defaults when no file
    /// exists yet.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new()
            .get_path(CONFIG_FILE_NAME)
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)
            .map_err(|_| crate::msg_error_anyhow!(Message::ConfigParseError))?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new()
            .get_path(CONFIG_FILE_NAME)
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Interactive setup wizard, pre-filled with current values.
    pub fn init() -> Result<Self> {
        let current = Config::read()?;

        let modes = [ProjectMode::Personal, ProjectMode::Professional];
        let default_index = modes.iter().position(|m| *m == current.general.default_mode).unwrap_or(0);
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptDefaultMode.to_string())
            .items(&modes.iter().map(|m| m.as_str()).collect::<Vec<_>>())
            .default(default_index)
            .interact()?;

        let timezone_offset_minutes: i32 = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptTimezoneOffset.to_string())
            .default(current.general.timezone_offset_minutes)
            .interact_text()?;

        let interval_secs: u64 = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSyncInterval.to_string())
            .default(current.sync.interval_secs)
            .interact_text()?;

        Ok(Config {
            general: GeneralConfig {
                default_mode: modes[selection],
                timezone_offset_minutes,
            },
            sync: SyncConfig { interval_secs },
        })
    }
}

/// The machine's current UTC offset in minutes, used as the initial
/// timezone setting.
pub fn local_offset_minutes() -> i32 {
    Local::now().offset().fix().local_minus_utc() / 60
}
