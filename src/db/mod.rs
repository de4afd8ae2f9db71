//! Database layer for the taskflow application.
//!
//! A SQLite persistence layer with one store module per entity. The schema
//! evolves through versioned migrations applied on connection open.
//!
//! The stores keep two denormalized counter families consistent with the
//! task rows that are their source of truth: project `task_count`/
//! `completed_task_count` and tag `usage_count`. Every adjustment happens
//! as a relative SQL update inside the transaction of the mutation that
//! caused it; the sync reconciler re-derives both from scratch to repair
//! any drift (for example after a crash between schema versions).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taskflow::db::{projects::Projects, tasks::Tasks};
//! use taskflow::libs::project::ProjectMode;
//! use taskflow::libs::task::NewTask;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut projects = Projects::new()?;
//! let inbox = projects.get_or_create_default(ProjectMode::Personal)?;
//!
//! let mut tasks = Tasks::new()?;
//! tasks.create(NewTask::new("Review the release notes"), ProjectMode::Personal, 0)?;
//! # Ok(())
//! # }
//! ```

/// Core database connection and initialization module.
pub mod db;

/// Versioned schema migration system.
pub mod migrations;

/// Project store: identity, archival state, and denormalized task counters.
pub mod projects;

/// Tag store: slugs, colors, usage counts, and task links.
pub mod tags;

/// Task store: CRUD, filtering, soft delete, and inline counter
/// reconciliation.
pub mod tasks;
