//! Relay counters
//!
//! Process-wide counters exposed through the status snapshot. They make the
//! lossy corners of the relay visible: duplicates absorbed, signals
//! superseded or trimmed before delivery, and delivery histories that
//! wrapped (which can lead to re-delivery).

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct RelayMetrics {
    pub signals_accepted: AtomicU64,
    pub control_acknowledged: AtomicU64,
    pub duplicates_dropped: AtomicU64,
    pub signals_superseded: AtomicU64,
    pub overflow_dropped: AtomicU64,
    pub signals_delivered: AtomicU64,
    pub signals_expired: AtomicU64,
    pub tracker_evictions: AtomicU64,
}

impl RelayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(counter: &AtomicU64, n: usize) {
        if n > 0 {
            counter.fetch_add(n as u64, Ordering::Relaxed);
        }
    }

    pub fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            signals_accepted: self.signals_accepted.load(Ordering::Relaxed),
            control_acknowledged: self.control_acknowledged.load(Ordering::Relaxed),
            duplicates_dropped: self.duplicates_dropped.load(Ordering::Relaxed),
            signals_superseded: self.signals_superseded.load(Ordering::Relaxed),
            overflow_dropped: self.overflow_dropped.load(Ordering::Relaxed),
            signals_delivered: self.signals_delivered.load(Ordering::Relaxed),
            signals_expired: self.signals_expired.load(Ordering::Relaxed),
            tracker_evictions: self.tracker_evictions.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`RelayMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub signals_accepted: u64,
    pub control_acknowledged: u64,
    pub duplicates_dropped: u64,
    pub signals_superseded: u64,
    pub overflow_dropped: u64,
    pub signals_delivered: u64,
    pub signals_expired: u64,
    pub tracker_evictions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = RelayMetrics::new();
        RelayMetrics::incr(&metrics.signals_accepted);
        RelayMetrics::add(&metrics.signals_superseded, 3);
        RelayMetrics::add(&metrics.overflow_dropped, 0);

        let snap = metrics.snapshot();
        assert_eq!(snap.signals_accepted, 1);
        assert_eq!(snap.signals_superseded, 3);
        assert_eq!(snap.overflow_dropped, 0);
    }
}
