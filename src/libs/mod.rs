//! Core library modules for the taskflow application.
//!
//! Domain models, configuration, validation, background reconciliation,
//! and console presentation live here; the persistence stores are under
//! `crate::db`.

pub mod config;
pub mod data_storage;
pub mod export;
pub mod messages;
pub mod project;
pub mod sync;
pub mod task;
pub mod validation;
pub mod view;
