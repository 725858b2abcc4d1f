//! Engine limits and timings

use std::time::Duration;

/// Tunables for queue sizes, history sizes and retention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Maximum signals held per master; oldest are dropped first.
    pub queue_capacity: usize,
    /// Maximum delivered signal ids remembered per slave.
    ///
    /// A slave that falls more than this many signals behind can be handed
    /// an old signal again once its id has been evicted.
    pub tracker_capacity: usize,
    /// Age after which a queued signal is swept.
    pub retention: Duration,
    /// Period of the background sweep.
    pub sweep_interval: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 50,
            tracker_capacity: 200,
            retention: Duration::from_secs(600),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl RelayConfig {
    /// Clamp values that would make the engine degenerate.
    pub fn normalized(mut self) -> Self {
        self.queue_capacity = self.queue_capacity.max(1);
        self.tracker_capacity = self.tracker_capacity.max(1);
        if self.sweep_interval.is_zero() {
            self.sweep_interval = Duration::from_secs(1);
        }
        self
    }
}
