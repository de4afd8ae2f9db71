pub mod export;
pub mod init;
pub mod project;
pub mod sync;
pub mod tag;
pub mod task;

use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Manage tasks")]
    Task(task::TaskArgs),
    #[command(about = "Manage projects")]
    Project(project::ProjectArgs),
    #[command(about = "Manage tags")]
    Tag(tag::TagArgs),
    #[command(about = "Reconcile counters, once or on an interval")]
    Sync(sync::SyncArgs),
    #[command(about = "Export tasks or projects to CSV/JSON")]
    Export(export::ExportArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> anyhow::Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Task(args) => task::cmd(args).await,
            Commands::Project(args) => project::cmd(args).await,
            Commands::Tag(args) => tag::cmd(args).await,
            Commands::Sync(args) => sync::cmd(args).await,
            Commands::Export(args) => export::cmd(args),
        }
    }
}
