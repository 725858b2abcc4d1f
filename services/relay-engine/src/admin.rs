//! Operational resets

use copier_types::ids::{MasterId, SlaveId};
use serde::Serialize;
use tracing::info;

use crate::engine::RelayEngine;

/// What a clear actually removed. `None` means that part was not requested
/// or had nothing to clear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClearReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slave_processed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_queue: Option<usize>,
}

impl ClearReport {
    pub fn is_empty(&self) -> bool {
        self.slave_processed.is_none() && self.master_queue.is_none()
    }
}

impl RelayEngine {
    /// Forget a slave's delivery history and/or drop a master's queue.
    ///
    /// After the history is cleared, the slave's next polls re-deliver
    /// everything still queued, oldest first.
    pub fn clear(&self, master_id: Option<&MasterId>, slave_id: Option<&SlaveId>) -> ClearReport {
        let mut report = ClearReport::default();

        if let Some(slave_id) = slave_id {
            if let Some(mut tracker) = self.trackers.get_mut(slave_id) {
                let count = tracker.clear();
                info!(slave_id = %slave_id, count, "Cleared processed signals");
                report.slave_processed = Some(count);
            }
        }

        if let Some(master_id) = master_id {
            if let Some((_, queue)) = self.queues.remove(master_id) {
                info!(master_id = %master_id, count = queue.len(), "Cleared signal queue");
                report.master_queue = Some(queue.len());
            }
        }

        report
    }
}
