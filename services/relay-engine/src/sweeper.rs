//! Retention sweeper
//!
//! Periodically removes signals older than the retention window and drops
//! master queues that end up empty. Each queue is pruned under its own lock,
//! so a sweep never races an upload to the same master.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use chrono::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::engine::RelayEngine;
use crate::metrics::RelayMetrics;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub signals_removed: usize,
    pub queues_removed: usize,
}

pub struct RetentionSweeper;

impl RetentionSweeper {
    /// Run one sweep over every master queue.
    pub fn sweep(engine: &RelayEngine) -> SweepReport {
        let now = engine.clock.now();
        // Retention beyond chrono's range means "keep forever".
        let retention = Duration::from_std(engine.config.retention).unwrap_or(Duration::MAX);
        let mut report = SweepReport::default();

        engine.queues.retain(|master_id, queue| {
            let removed = queue.prune_expired(now, retention);
            if removed > 0 {
                info!(master_id = %master_id, removed, remaining = queue.len(), "Cleaned old signals");
                report.signals_removed += removed;
            }
            if queue.is_empty() {
                report.queues_removed += 1;
                false
            } else {
                true
            }
        });

        RelayMetrics::add(&engine.metrics.signals_expired, report.signals_removed);
        report
    }

    /// Sweep on `sweep_interval` until the returned task is aborted.
    ///
    /// A panicking sweep is logged and the loop carries on with the next
    /// tick.
    pub fn spawn(engine: Arc<RelayEngine>) -> JoinHandle<()> {
        let period = engine.config.sweep_interval;
        info!(interval_secs = period.as_secs(), "Retention sweeper started");

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // First tick completes immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                match panic::catch_unwind(AssertUnwindSafe(|| Self::sweep(&engine))) {
                    Ok(report) => debug!(
                        signals_removed = report.signals_removed,
                        queues_removed = report.queues_removed,
                        "Retention sweep complete"
                    ),
                    Err(_) => error!("Retention sweep panicked; continuing"),
                }
            }
        })
    }
}
