//! Per-master signal queue
//!
//! Holds a master's outstanding signals in arrival order, bounded in size.
//! The queue applies the insert policy for each action; callers are
//! responsible for holding the master's lock across a whole insert.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use copier_types::ids::{SignalId, Ticket};
use copier_types::signal::{Action, Signal};
use serde::Serialize;

use crate::tracker::ProcessedTracker;

/// How a new signal is merged into the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPolicy {
    /// Append unconditionally (modifications).
    AlwaysAppend,
    /// Drop every queued signal for the ticket, then append (close/delete).
    SupersedeAndAppend,
    /// Append unless the same ticket/action/symbol is already queued (opens).
    DedupAppend,
}

impl InsertPolicy {
    /// Policy for a queueable action. Control actions have none.
    pub fn for_action(action: Action) -> Option<Self> {
        match action {
            Action::ModifyTrade | Action::ModifyPending => Some(InsertPolicy::AlwaysAppend),
            Action::CloseTrade | Action::DeleteOrder => Some(InsertPolicy::SupersedeAndAppend),
            Action::NewTrade | Action::NewPending => Some(InsertPolicy::DedupAppend),
            Action::InitTest | Action::Heartbeat => None,
        }
    }
}

/// What happened to a signal offered to the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Disposition {
    Appended,
    Superseded { removed: usize },
    /// Dropped; `existing` is the queued open it matched.
    Duplicate { existing: SignalId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertResult {
    pub disposition: Disposition,
    /// Oldest entries dropped to stay within capacity.
    pub overflow_dropped: usize,
}

#[derive(Debug, Clone)]
pub struct MasterQueue {
    signals: VecDeque<Signal>,
    capacity: usize,
}

impl MasterQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            signals: VecDeque::with_capacity(capacity.min(64)),
            capacity: capacity.max(1),
        }
    }

    /// Merge a signal according to `policy`, then trim to capacity.
    pub fn insert(&mut self, policy: InsertPolicy, signal: Signal) -> InsertResult {
        let disposition = match policy {
            InsertPolicy::AlwaysAppend => {
                self.signals.push_back(signal);
                Disposition::Appended
            }
            InsertPolicy::SupersedeAndAppend => {
                let removed = self.remove_ticket(&signal.master_ticket);
                self.signals.push_back(signal);
                if removed > 0 {
                    Disposition::Superseded { removed }
                } else {
                    Disposition::Appended
                }
            }
            InsertPolicy::DedupAppend => {
                if let Some(existing) = self.find_open(&signal).cloned() {
                    Disposition::Duplicate { existing }
                } else {
                    self.signals.push_back(signal);
                    Disposition::Appended
                }
            }
        };

        let mut overflow_dropped = 0;
        while self.signals.len() > self.capacity {
            self.signals.pop_front();
            overflow_dropped += 1;
        }

        InsertResult {
            disposition,
            overflow_dropped,
        }
    }

    fn remove_ticket(&mut self, ticket: &Ticket) -> usize {
        let before = self.signals.len();
        self.signals.retain(|s| &s.master_ticket != ticket);
        before - self.signals.len()
    }

    fn find_open(&self, signal: &Signal) -> Option<&SignalId> {
        self.signals
            .iter()
            .find(|s| {
                s.master_ticket == signal.master_ticket
                    && s.action == signal.action
                    && s.symbol == signal.symbol
            })
            .map(|s| &s.signal_id)
    }

    /// Remove signals at least `retention` old. Signals stamped after `now`
    /// are kept. Returns how many were removed.
    pub fn prune_expired(&mut self, now: DateTime<Utc>, retention: Duration) -> usize {
        let before = self.signals.len();
        self.signals
            .retain(|s| now.signed_duration_since(s.server_timestamp) < retention);
        before - self.signals.len()
    }

    /// Oldest signal the slave has not been handed yet.
    pub fn first_unprocessed(&self, tracker: &ProcessedTracker) -> Option<&Signal> {
        self.signals.iter().find(|s| !tracker.contains(&s.signal_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signal> {
        self.signals.iter()
    }

    pub fn oldest(&self) -> Option<&Signal> {
        self.signals.front()
    }

    pub fn latest(&self) -> Option<&Signal> {
        self.signals.back()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copier_types::ids::MasterId;
    use serde_json::Map;

    fn signal(id: &str, ticket: i64, action: Action, symbol: &str, at: DateTime<Utc>) -> Signal {
        Signal {
            master_id: MasterId::try_new("M1").unwrap(),
            master_ticket: Ticket::Number(ticket),
            action,
            symbol: Some(symbol.to_string()),
            server_timestamp: at,
            signal_id: SignalId::from_string(id),
            payload: Map::new(),
        }
    }

    fn ids(queue: &MasterQueue) -> Vec<String> {
        queue.iter().map(|s| s.signal_id.to_string()).collect()
    }

    #[test]
    fn test_policy_mapping() {
        assert_eq!(
            InsertPolicy::for_action(Action::ModifyPending),
            Some(InsertPolicy::AlwaysAppend)
        );
        assert_eq!(
            InsertPolicy::for_action(Action::DeleteOrder),
            Some(InsertPolicy::SupersedeAndAppend)
        );
        assert_eq!(
            InsertPolicy::for_action(Action::NewPending),
            Some(InsertPolicy::DedupAppend)
        );
        assert_eq!(InsertPolicy::for_action(Action::Heartbeat), None);
        assert_eq!(InsertPolicy::for_action(Action::InitTest), None);
    }

    #[test]
    fn test_dedup_append_drops_identical_open() {
        let now = Utc::now();
        let mut queue = MasterQueue::new(50);

        let first = queue.insert(
            InsertPolicy::DedupAppend,
            signal("a", 1, Action::NewTrade, "EURUSD", now),
        );
        let second = queue.insert(
            InsertPolicy::DedupAppend,
            signal("b", 1, Action::NewTrade, "EURUSD", now),
        );

        assert_eq!(first.disposition, Disposition::Appended);
        assert_eq!(
            second.disposition,
            Disposition::Duplicate {
                existing: SignalId::from_string("a")
            }
        );
        assert_eq!(ids(&queue), vec!["a"]);
    }

    #[test]
    fn test_dedup_append_distinguishes_symbol_and_action() {
        let now = Utc::now();
        let mut queue = MasterQueue::new(50);

        queue.insert(InsertPolicy::DedupAppend, signal("a", 1, Action::NewTrade, "EURUSD", now));
        queue.insert(InsertPolicy::DedupAppend, signal("b", 1, Action::NewTrade, "GBPUSD", now));
        queue.insert(InsertPolicy::DedupAppend, signal("c", 1, Action::NewPending, "EURUSD", now));

        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_supersede_removes_every_action_for_ticket() {
        let now = Utc::now();
        let mut queue = MasterQueue::new(50);

        queue.insert(InsertPolicy::DedupAppend, signal("open", 5, Action::NewTrade, "EURUSD", now));
        queue.insert(InsertPolicy::AlwaysAppend, signal("mod", 5, Action::ModifyTrade, "EURUSD", now));
        queue.insert(InsertPolicy::DedupAppend, signal("other", 6, Action::NewTrade, "EURUSD", now));

        let result = queue.insert(
            InsertPolicy::SupersedeAndAppend,
            signal("close", 5, Action::CloseTrade, "EURUSD", now),
        );

        assert_eq!(result.disposition, Disposition::Superseded { removed: 2 });
        assert_eq!(ids(&queue), vec!["other", "close"]);
    }

    #[test]
    fn test_supersede_without_predecessors_is_plain_append() {
        let mut queue = MasterQueue::new(50);
        let result = queue.insert(
            InsertPolicy::SupersedeAndAppend,
            signal("close", 5, Action::CloseTrade, "EURUSD", Utc::now()),
        );
        assert_eq!(result.disposition, Disposition::Appended);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let now = Utc::now();
        let mut queue = MasterQueue::new(3);
        let mut dropped = 0;
        for i in 0..5 {
            let result = queue.insert(
                InsertPolicy::AlwaysAppend,
                signal(&format!("s{}", i), 1, Action::ModifyTrade, "EURUSD", now),
            );
            dropped += result.overflow_dropped;
        }

        assert_eq!(dropped, 2);
        assert_eq!(ids(&queue), vec!["s2", "s3", "s4"]);
    }

    #[test]
    fn test_prune_expired() {
        let now = Utc::now();
        let retention = Duration::minutes(10);
        let mut queue = MasterQueue::new(50);

        queue.insert(
            InsertPolicy::AlwaysAppend,
            signal("old", 1, Action::ModifyTrade, "EURUSD", now - Duration::minutes(11)),
        );
        queue.insert(
            InsertPolicy::AlwaysAppend,
            signal("edge", 2, Action::ModifyTrade, "EURUSD", now - Duration::minutes(10)),
        );
        queue.insert(
            InsertPolicy::AlwaysAppend,
            signal("fresh", 3, Action::ModifyTrade, "EURUSD", now - Duration::minutes(9)),
        );
        queue.insert(
            InsertPolicy::AlwaysAppend,
            signal("future", 4, Action::ModifyTrade, "EURUSD", now + Duration::minutes(1)),
        );

        assert_eq!(queue.prune_expired(now, retention), 2);
        assert_eq!(ids(&queue), vec!["fresh", "future"]);
    }

    #[test]
    fn test_first_unprocessed_skips_tracked() {
        let now = Utc::now();
        let mut queue = MasterQueue::new(50);
        queue.insert(InsertPolicy::AlwaysAppend, signal("a", 1, Action::ModifyTrade, "X", now));
        queue.insert(InsertPolicy::AlwaysAppend, signal("b", 1, Action::ModifyTrade, "X", now));

        let mut tracker = ProcessedTracker::new(10);
        assert_eq!(queue.first_unprocessed(&tracker).unwrap().signal_id.as_str(), "a");

        tracker.insert(SignalId::from_string("a"));
        assert_eq!(queue.first_unprocessed(&tracker).unwrap().signal_id.as_str(), "b");

        tracker.insert(SignalId::from_string("b"));
        assert!(queue.first_unprocessed(&tracker).is_none());
    }
}
