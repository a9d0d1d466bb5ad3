//! Staging reaper
//!
//! Staged downloads only live until a business decision promotes or
//! discards them. Anything that outlives the configured age is an orphan
//! from a crashed or abandoned flow, and this task reclaims it.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;

use mediadesk_storage::{StagingArea, SweepStats};

/// Background task that periodically sweeps stale files out of staging.
#[derive(Clone)]
pub struct TempReaper {
    staging: StagingArea,
    interval: Duration,
    max_age: Duration,
}

impl TempReaper {
    pub fn new(staging: StagingArea, interval_secs: u64, max_age_minutes: u64) -> Self {
        Self {
            staging,
            interval: Duration::from_secs(interval_secs),
            max_age: Duration::from_secs(max_age_minutes * 60),
        }
    }

    /// Start the periodic sweep task.
    /// Returns a JoinHandle for graceful shutdown.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut sweep_interval = interval(self.interval);

            loop {
                sweep_interval.tick().await;

                let stats = self.sweep_once().await;
                if stats.deleted > 0 || stats.errors > 0 {
                    tracing::info!(
                        scanned = stats.scanned,
                        deleted = stats.deleted,
                        errors = stats.errors,
                        "Staging sweep completed"
                    );
                } else {
                    tracing::debug!(scanned = stats.scanned, "Staging sweep found nothing stale");
                }
            }
        })
    }

    /// Run a single sweep. Per-file errors are handled inside the sweep and
    /// surface only as counts.
    pub async fn sweep_once(&self) -> SweepStats {
        self.staging.sweep_older_than(self.max_age).await
    }
}
