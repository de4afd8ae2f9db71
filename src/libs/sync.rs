//! Background counter reconciliation.
//!
//! The denormalized counters (project `task_count`/`completed_task_count`,
//! tag `usage_count`) are adjusted inline by the stores, but a crash between
//! schema versions or a hand-edited database can still leave them off. The
//! sync manager periodically re-derives every counter from the task rows
//! that are their source of truth and repairs whatever disagrees.
//!
//! The manager is a small state machine, `Idle -> Running -> Idle`, driven
//! by a tokio interval. A cycle that is still running when the next tick
//! arrives causes that tick to be skipped rather than overlapped. Cycle
//! errors are logged and the loop keeps going.

use crate::db::db::Db;
use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration};

const REPAIR_PROJECT_COUNTERS: &str = "UPDATE projects SET
    task_count = (SELECT COUNT(*) FROM tasks t WHERE t.project_id = projects.id AND t.is_deleted = 0),
    completed_task_count = (SELECT COUNT(*) FROM tasks t
        WHERE t.project_id = projects.id AND t.is_deleted = 0 AND t.completed = 1)
    WHERE is_deleted = 0 AND (
        task_count != (SELECT COUNT(*) FROM tasks t WHERE t.project_id = projects.id AND t.is_deleted = 0)
        OR completed_task_count != (SELECT COUNT(*) FROM tasks t
            WHERE t.project_id = projects.id AND t.is_deleted = 0 AND t.completed = 1))";
const REPAIR_TAG_USAGE: &str = "UPDATE tags SET
    usage_count = (SELECT COUNT(*) FROM task_tags tt JOIN tasks t ON t.id = tt.task_id
        WHERE tt.tag_id = tags.id AND t.is_deleted = 0)
    WHERE usage_count != (SELECT COUNT(*) FROM task_tags tt JOIN tasks t ON t.id = tt.task_id
        WHERE tt.tag_id = tags.id AND t.is_deleted = 0)";
const STAMP_SYNC_TIME: &str = "UPDATE sync_state SET last_sync_time = ?1 WHERE id = 1";
const SELECT_SYNC_TIME: &str = "SELECT last_sync_time FROM sync_state WHERE id = 1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Running,
}

/// Outcome of one reconciliation cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileReport {
    pub projects_repaired: usize,
    pub tags_repaired: usize,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.projects_repaired == 0 && self.tags_repaired == 0
    }
}

#[derive(Debug, Clone)]
pub enum SyncEvent {
    Completed {
        report: ReconcileReport,
        at: DateTime<Utc>,
    },
    Failed {
        error: String,
    },
}

type Observer = Arc<dyn Fn(SyncEvent) + Send + Sync>;

/// Recomputes all denormalized counters from task rows and stamps
/// `last_sync_time`, in one transaction.
pub fn reconcile(conn: &mut Connection) -> Result<ReconcileReport> {
    let tx = conn.transaction()?;
    let projects_repaired = tx.execute(REPAIR_PROJECT_COUNTERS, [])?;
    let tags_repaired = tx.execute(REPAIR_TAG_USAGE, [])?;
    tx.execute(STAMP_SYNC_TIME, params![Utc::now()])?;
    tx.commit()?;

    Ok(ReconcileReport {
        projects_repaired,
        tags_repaired,
    })
}

/// When the last successful cycle ran, if any.
pub fn last_sync_time(conn: &Connection) -> Result<Option<DateTime<Utc>>> {
    let time: Option<DateTime<Utc>> = conn.query_row(SELECT_SYNC_TIME, [], |row| row.get(0))?;
    Ok(time)
}

pub struct SyncManager {
    interval_secs: u64,
    state: Arc<Mutex<SyncState>>,
    observer: Option<Observer>,
    handle: Option<JoinHandle<()>>,
}

impl SyncManager {
    pub fn new(interval_secs: u64) -> Self {
        Self {
            interval_secs,
            state: Arc::new(Mutex::new(SyncState::Idle)),
            observer: None,
            handle: None,
        }
    }

    /// Registers a callback invoked after every cycle.
    pub fn with_observer(mut self, observer: impl Fn(SyncEvent) + Send + Sync + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    pub fn state(&self) -> SyncState {
        *self.state.lock()
    }

    /// Runs one reconciliation cycle immediately, outside the timer loop.
    pub fn run_once(&self) -> Result<ReconcileReport> {
        {
            let mut state = self.state.lock();
            if *state == SyncState::Running {
                return Err(crate::msg_error_anyhow!(crate::libs::messages::Message::SyncAlreadyRunning));
            }
            *state = SyncState::Running;
        }

        let result = Db::new().and_then(|mut db| reconcile(&mut db.conn));
        *self.state.lock() = SyncState::Idle;

        let report = result?;
        if let Some(observer) = &self.observer {
            observer(SyncEvent::Completed {
                report,
                at: Utc::now(),
            });
        }
        Ok(report)
    }

    /// Starts the periodic loop. Calling `start` twice is a no-op.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }

        let state = self.state.clone();
        let observer = self.observer.clone();
        let interval_secs = self.interval_secs.max(1);

        self.handle = Some(tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(interval_secs));
            // The first tick fires immediately; skip it so the loop waits a
            // full interval before its first cycle.
            interval.tick().await;

            loop {
                interval.tick().await;

                {
                    let mut guard = state.lock();
                    if *guard == SyncState::Running {
                        tracing::debug!("skipping sync tick, previous cycle still running");
                        continue;
                    }
                    *guard = SyncState::Running;
                }

                let result = Db::new().and_then(|mut db| reconcile(&mut db.conn));
                *state.lock() = SyncState::Idle;

                match result {
                    Ok(report) => {
                        tracing::debug!(
                            projects = report.projects_repaired,
                            tags = report.tags_repaired,
                            "sync cycle complete"
                        );
                        if let Some(observer) = &observer {
                            observer(SyncEvent::Completed {
                                report,
                                at: Utc::now(),
                            });
                        }
                    }
                    Err(e) => {
                        tracing::warn!("sync cycle failed: {}", e);
                        if let Some(observer) = &observer {
                            observer(SyncEvent::Failed { error: e.to_string() });
                        }
                    }
                }
            }
        }));
    }

    /// Stops the periodic loop. A cycle already in flight is aborted with it.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            *self.state.lock() = SyncState::Idle;
        }
    }
}

impl Drop for SyncManager {
    fn drop(&mut self) {
        self.stop();
    }
}
