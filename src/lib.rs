//! # Taskflow - local-first task and project management
//!
//! A command-line utility for managing tasks, projects, and tags on top of
//! a local SQLite store.
//!
//! ## Features
//!
//! - **Task Management**: Create, edit, complete, move, and soft-delete tasks
//! - **Projects**: Per-mode project lists with an undeletable default Inbox
//! - **Consistent Counters**: Denormalized per-project task counts adjusted
//!   transactionally and repaired by a background reconciliation loop
//! - **Tag System**: Slug-based tags with usage counts
//! - **Data Export**: Export tasks and projects to CSV and JSON
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taskflow::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
