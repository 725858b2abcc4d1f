//! Signal ingestion
//!
//! Validates uploads from masters and merges them into the master's queue.
//! Validation happens before any lock is taken, so a rejected upload never
//! touches state. The whole merge (supersede, dedup scan, append, trim)
//! runs under the master's queue lock.

use copier_types::errors::ValidationError;
use copier_types::ids::{MasterId, SignalId, Ticket};
use copier_types::signal::{Action, Signal, SignalRequest};
use tracing::{debug, info, warn};

use crate::engine::RelayEngine;
use crate::master_queue::{Disposition, InsertPolicy};
use crate::metrics::RelayMetrics;

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// Control action (`INIT_TEST`, `HEARTBEAT`); nothing was queued.
    Acknowledged { master_id: MasterId, action: Action },
    Queued(QueuedSignal),
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueuedSignal {
    pub master_id: MasterId,
    pub action: Action,
    pub ticket: Ticket,
    /// Id of the queued signal this upload resolved to. For a duplicate
    /// open this is the id of the entry already in the queue.
    pub signal_id: SignalId,
    pub disposition: Disposition,
    /// Queue length after the merge.
    pub pending: usize,
}

impl RelayEngine {
    pub fn ingest(&self, request: SignalRequest) -> Result<IngestOutcome, ValidationError> {
        let validated = request.validate()?;
        let action = validated.action;

        let Some(policy) = InsertPolicy::for_action(action) else {
            RelayMetrics::incr(&self.metrics.control_acknowledged);
            info!(master_id = %validated.master_id, action = %action, "Control signal acknowledged");
            return Ok(IngestOutcome::Acknowledged {
                master_id: validated.master_id,
                action,
            });
        };

        let now = self.clock.now();
        let master_id = validated.master_id.clone();
        let ticket = validated.master_ticket.clone();
        let stamped_id = self.next_signal_id(&ticket, action, now);
        let signal = Signal::stamp(validated, stamped_id.clone(), now);

        let (result, pending) = {
            let mut queue = self
                .queues
                .entry(master_id.clone())
                .or_insert_with(|| self.new_queue());
            let result = queue.insert(policy, signal);
            (result, queue.len())
        };

        let signal_id = match &result.disposition {
            Disposition::Duplicate { existing } => existing.clone(),
            _ => stamped_id,
        };

        match &result.disposition {
            Disposition::Appended => {
                RelayMetrics::incr(&self.metrics.signals_accepted);
                info!(
                    master_id = %master_id,
                    action = %action,
                    ticket = %ticket,
                    signal_id = %signal_id,
                    pending,
                    "Signal queued"
                );
            }
            Disposition::Superseded { removed } => {
                RelayMetrics::incr(&self.metrics.signals_accepted);
                RelayMetrics::add(&self.metrics.signals_superseded, *removed);
                info!(
                    master_id = %master_id,
                    action = %action,
                    ticket = %ticket,
                    signal_id = %signal_id,
                    removed = *removed,
                    pending,
                    "Signal queued, superseding pending signals for ticket"
                );
            }
            Disposition::Duplicate { existing } => {
                RelayMetrics::incr(&self.metrics.duplicates_dropped);
                debug!(
                    master_id = %master_id,
                    action = %action,
                    ticket = %ticket,
                    existing = %existing,
                    "Duplicate open signal dropped"
                );
            }
        }

        if result.overflow_dropped > 0 {
            RelayMetrics::add(&self.metrics.overflow_dropped, result.overflow_dropped);
            warn!(
                master_id = %master_id,
                dropped = result.overflow_dropped,
                capacity = self.config.queue_capacity,
                "Queue limit reached, oldest signals dropped"
            );
        }

        Ok(IngestOutcome::Queued(QueuedSignal {
            master_id,
            action,
            ticket,
            signal_id,
            disposition: result.disposition,
            pending,
        }))
    }
}
