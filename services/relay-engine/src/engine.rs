//! Relay state store
//!
//! [`RelayEngine`] owns all queues, delivery histories and registrations.
//! It is shared behind an `Arc` between request handlers and the sweeper.
//! The operations themselves live in `ingestion`, `dispatcher`, `admin`,
//! `status` and `sweeper`.
//!
//! Locking: each map entry is guarded by its dashmap shard lock. A queue
//! guard may be held while a tracker guard is taken, never the other way
//! round, and no path holds two guards of the same map.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use copier_types::ids::{MasterId, SignalId, SlaveId, Ticket};
use copier_types::signal::{Action, Signal};
use dashmap::DashMap;
use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::config::RelayConfig;
use crate::master_queue::MasterQueue;
use crate::metrics::RelayMetrics;
use crate::registry::SlaveRegistry;
use crate::tracker::ProcessedTracker;

pub struct RelayEngine {
    pub(crate) config: RelayConfig,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) queues: DashMap<MasterId, MasterQueue>,
    pub(crate) trackers: DashMap<SlaveId, ProcessedTracker>,
    pub(crate) registry: SlaveRegistry,
    pub(crate) metrics: RelayMetrics,
    sequence: AtomicU64,
}

impl RelayEngine {
    pub fn new(config: RelayConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RelayConfig, clock: Arc<dyn Clock>) -> Self {
        let config = config.normalized();
        info!(
            queue_capacity = config.queue_capacity,
            tracker_capacity = config.tracker_capacity,
            retention_secs = config.retention.as_secs(),
            sweep_interval_secs = config.sweep_interval.as_secs(),
            "RelayEngine initialized"
        );

        Self {
            config,
            clock,
            queues: DashMap::new(),
            trackers: DashMap::new(),
            registry: SlaveRegistry::new(),
            metrics: RelayMetrics::new(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn metrics(&self) -> &RelayMetrics {
        &self.metrics
    }

    pub fn registry(&self) -> &SlaveRegistry {
        &self.registry
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Number of signals queued for a master; zero when it has no queue.
    pub fn pending_count(&self, master_id: &MasterId) -> usize {
        self.queues.get(master_id).map(|q| q.len()).unwrap_or(0)
    }

    /// Copy of a master's queue in arrival order.
    pub fn queued_signals(&self, master_id: &MasterId) -> Vec<Signal> {
        self.queues
            .get(master_id)
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn has_queue(&self, master_id: &MasterId) -> bool {
        self.queues.contains_key(master_id)
    }

    /// Number of ids currently remembered for a slave.
    pub fn processed_count(&self, slave_id: &SlaveId) -> usize {
        self.trackers.get(slave_id).map(|t| t.len()).unwrap_or(0)
    }

    pub(crate) fn new_tracker(&self) -> ProcessedTracker {
        ProcessedTracker::new(self.config.tracker_capacity)
    }

    pub(crate) fn new_queue(&self) -> MasterQueue {
        MasterQueue::new(self.config.queue_capacity)
    }

    /// `ticket_ACTION_millis_seq`. The sequence keeps ids distinct when the
    /// same ticket and action arrive within one millisecond.
    pub(crate) fn next_signal_id(&self, ticket: &Ticket, action: Action, at: DateTime<Utc>) -> SignalId {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        SignalId::from_string(format!(
            "{}_{}_{}_{}",
            ticket,
            action,
            at.timestamp_millis(),
            seq
        ))
    }
}
