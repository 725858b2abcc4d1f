//! Per-slave delivery history
//!
//! Remembers which signal ids a slave has already been handed. Bounded:
//! the oldest ids are forgotten first, in the order they were recorded.

use std::collections::{HashSet, VecDeque};

use copier_types::ids::SignalId;

#[derive(Debug, Clone)]
pub struct ProcessedTracker {
    /// Ids in the order they were recorded.
    order: VecDeque<SignalId>,
    /// Membership index over `order`.
    members: HashSet<SignalId>,
    capacity: usize,
    /// Ids forgotten over this tracker's lifetime.
    evicted: u64,
}

impl ProcessedTracker {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            order: VecDeque::with_capacity(capacity.min(64)),
            members: HashSet::with_capacity(capacity.min(64)),
            capacity,
            evicted: 0,
        }
    }

    pub fn contains(&self, id: &SignalId) -> bool {
        self.members.contains(id)
    }

    /// Record an id and trim to capacity. Returns how many ids were evicted.
    pub fn insert(&mut self, id: SignalId) -> usize {
        if !self.members.insert(id.clone()) {
            return 0;
        }
        self.order.push_back(id);

        let mut evicted = 0;
        while self.order.len() > self.capacity {
            if let Some(old) = self.order.pop_front() {
                self.members.remove(&old);
                evicted += 1;
            }
        }
        self.evicted += evicted as u64;
        evicted
    }

    /// Forget everything. Returns the number of ids dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.order.len();
        self.order.clear();
        self.members.clear();
        count
    }

    /// Up to `n` most recently recorded ids, oldest first.
    pub fn recent(&self, n: usize) -> Vec<SignalId> {
        let skip = self.order.len().saturating_sub(n);
        self.order.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn evicted(&self) -> u64 {
        self.evicted
    }
}
