//! Poll dispatch
//!
//! Hands a slave the oldest signal of its master that it has not received
//! yet, one signal per poll. The scan and the processed-mark happen while
//! both the master's queue and the slave's tracker are locked, so two
//! concurrent polls of the same slave can never receive the same signal.

use copier_types::ids::{MasterId, SlaveId};
use copier_types::signal::Signal;
use tracing::{debug, info, warn};

use crate::engine::RelayEngine;
use crate::metrics::RelayMetrics;
use crate::registry::SlaveRegistration;

impl RelayEngine {
    /// Register (or refresh) a slave for a master.
    pub fn register(&self, master_id: &MasterId, slave_id: &SlaveId) -> SlaveRegistration {
        let registration = self.registry.register(master_id, slave_id, self.clock.now());
        self.trackers
            .entry(slave_id.clone())
            .or_insert_with(|| self.new_tracker());
        info!(slave_id = %slave_id, master_id = %master_id, "Slave registered");
        registration
    }

    /// Next undelivered signal for `slave_id`, if any.
    ///
    /// A slave's history is shared across masters and bounded; once an id
    /// has been evicted from it, that signal is eligible again.
    pub fn poll(&self, master_id: &MasterId, slave_id: &SlaveId) -> Option<Signal> {
        if self.registry.touch(master_id, slave_id, self.clock.now()) {
            info!(slave_id = %slave_id, master_id = %master_id, "Slave auto-registered on poll");
        }

        let queue = self.queues.get(master_id)?;
        let mut tracker = self
            .trackers
            .entry(slave_id.clone())
            .or_insert_with(|| self.new_tracker());

        let signal = queue.first_unprocessed(&tracker)?.clone();
        let evicted = tracker.insert(signal.signal_id.clone());
        let tracked = tracker.len();
        drop(tracker);
        drop(queue);

        RelayMetrics::incr(&self.metrics.signals_delivered);
        debug!(
            slave_id = %slave_id,
            master_id = %master_id,
            action = %signal.action,
            ticket = %signal.master_ticket,
            signal_id = %signal.signal_id,
            "Signal delivered"
        );

        if evicted > 0 {
            RelayMetrics::add(&self.metrics.tracker_evictions, evicted);
            warn!(
                slave_id = %slave_id,
                evicted,
                tracked,
                "Processed history full; oldest ids forgotten and may be re-delivered"
            );
        }

        Some(signal)
    }
}
