//! Read-only introspection
//!
//! Builds a copy of the relay state. Each queue and tracker is locked only
//! for as long as it takes to copy it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use copier_types::ids::{MasterId, SignalId, SlaveId};
use copier_types::signal::{Action, Signal};
use serde::Serialize;

use crate::engine::RelayEngine;
use crate::metrics::MetricsSnapshot;

/// Number of recent ids shown per slave.
const RECENT_PROCESSED: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct MasterStatus {
    pub pending_signals: usize,
    pub latest_signal: Option<Signal>,
    pub oldest_signal: Option<Signal>,
    pub connected_slaves: Vec<SlaveId>,
    pub signals_by_action: BTreeMap<Action, usize>,
    /// `ticket(ACTION)` per queued signal, oldest first.
    pub signal_list: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlaveStatus {
    pub processed_count: usize,
    /// Ids forgotten because the history was full.
    pub evicted: u64,
    pub last_10_processed: Vec<SignalId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub timestamp: DateTime<Utc>,
    pub masters: BTreeMap<MasterId, MasterStatus>,
    pub slaves: BTreeMap<SlaveId, SlaveStatus>,
    pub total_pending_signals: usize,
    pub metrics: MetricsSnapshot,
}

/// Headline numbers for the service banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub active_masters: usize,
    pub total_signals: usize,
    pub registered_slaves: usize,
}

impl RelayEngine {
    pub fn status(&self) -> StatusSnapshot {
        let mut masters = BTreeMap::new();
        for entry in self.queues.iter() {
            let queue = entry.value();
            let mut signals_by_action = BTreeMap::new();
            for signal in queue.iter() {
                *signals_by_action.entry(signal.action).or_insert(0) += 1;
            }
            masters.insert(
                entry.key().clone(),
                MasterStatus {
                    pending_signals: queue.len(),
                    latest_signal: queue.latest().cloned(),
                    oldest_signal: queue.oldest().cloned(),
                    connected_slaves: Vec::new(),
                    signals_by_action,
                    signal_list: queue.iter().map(Signal::label).collect(),
                },
            );
        }

        // Registry is read after the queue guards are released.
        for (master_id, status) in masters.iter_mut() {
            status.connected_slaves = self.registry.slaves_of(master_id);
        }

        let slaves = self
            .trackers
            .iter()
            .map(|entry| {
                let tracker = entry.value();
                (
                    entry.key().clone(),
                    SlaveStatus {
                        processed_count: tracker.len(),
                        evicted: tracker.evicted(),
                        last_10_processed: tracker.recent(RECENT_PROCESSED),
                    },
                )
            })
            .collect();

        let total_pending_signals = masters.values().map(|m| m.pending_signals).sum();

        StatusSnapshot {
            timestamp: self.clock.now(),
            masters,
            slaves,
            total_pending_signals,
            metrics: self.metrics.snapshot(),
        }
    }

    pub fn overview(&self) -> Overview {
        let (active_masters, total_signals) = self
            .queues
            .iter()
            .fold((0, 0), |(masters, signals), entry| (masters + 1, signals + entry.value().len()));

        Overview {
            active_masters,
            total_signals,
            registered_slaves: self.registry.total(),
        }
    }
}
