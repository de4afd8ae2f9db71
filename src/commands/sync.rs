use crate::{
    db::db::Db,
    libs::{
        config::Config,
        messages::Message,
        sync::{last_sync_time, SyncManager},
    },
    msg_info, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct SyncArgs {
    #[command(subcommand)]
    command: Option<SyncCommand>,
}

#[derive(Debug, Subcommand)]
enum SyncCommand {
    /// Run one reconciliation cycle and exit
    Once,
    /// Run reconciliation on the configured interval until interrupted
    Watch,
    /// Show when the last cycle ran
    Status,
}

pub async fn cmd(args: SyncArgs) -> Result<()> {
    match args.command {
        Some(SyncCommand::Watch) => handle_watch().await,
        Some(SyncCommand::Status) => handle_status(),
        Some(SyncCommand::Once) | None => handle_once(),
    }
}

fn handle_once() -> Result<()> {
    let manager = SyncManager::new(Config::read()?.sync.interval_secs);
    let report = manager.run_once()?;

    if report.is_clean() {
        msg_success!(Message::SyncNothingToRepair);
    } else {
        msg_success!(Message::SyncCompleted(report.projects_repaired, report.tags_repaired));
    }
    Ok(())
}

async fn handle_watch() -> Result<()> {
    let config = Config::read()?;
    let mut manager = SyncManager::new(config.sync.interval_secs).with_observer(|event| match event {
        crate::libs::sync::SyncEvent::Completed { report, .. } => {
            if report.is_clean() {
                crate::msg_info!(Message::SyncNothingToRepair);
            } else {
                crate::msg_success!(Message::SyncCompleted(report.projects_repaired, report.tags_repaired));
            }
        }
        crate::libs::sync::SyncEvent::Failed { error } => {
            crate::msg_error!(Message::SyncFailed(error));
        }
    });

    manager.start();
    msg_info!(Message::SyncStarted);

    tokio::signal::ctrl_c().await?;
    manager.stop();
    msg_info!(Message::SyncStopped);
    Ok(())
}

fn handle_status() -> Result<()> {
    let db = Db::new()?;
    match last_sync_time(&db.conn)? {
        Some(time) => msg_info!(Message::LastSyncTime(time.format("%Y-%m-%d %H:%M:%S UTC").to_string())),
        None => msg_info!(Message::NeverSynced),
    }
    Ok(())
}
