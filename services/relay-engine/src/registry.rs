//! Slave registrations
//!
//! Advisory bookkeeping of which slaves follow which master. Never gates
//! delivery: polling registers unknown slaves on the fly.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use copier_types::ids::{MasterId, SlaveId};
use dashmap::DashMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlaveRegistration {
    pub registered_at: DateTime<Utc>,
    pub last_poll: DateTime<Utc>,
}

impl SlaveRegistration {
    fn new(at: DateTime<Utc>) -> Self {
        Self {
            registered_at: at,
            last_poll: at,
        }
    }
}

pub struct SlaveRegistry {
    slaves: DashMap<MasterId, BTreeMap<SlaveId, SlaveRegistration>>,
}

impl SlaveRegistry {
    pub fn new() -> Self {
        Self {
            slaves: DashMap::new(),
        }
    }

    /// Create or refresh a registration.
    pub fn register(&self, master_id: &MasterId, slave_id: &SlaveId, at: DateTime<Utc>) -> SlaveRegistration {
        let registration = SlaveRegistration::new(at);
        self.slaves
            .entry(master_id.clone())
            .or_default()
            .insert(slave_id.clone(), registration);
        registration
    }

    /// Record a poll. Returns true when the slave was unknown and got
    /// registered by this call.
    pub fn touch(&self, master_id: &MasterId, slave_id: &SlaveId, at: DateTime<Utc>) -> bool {
        let mut slaves = self.slaves.entry(master_id.clone()).or_default();
        match slaves.get_mut(slave_id) {
            Some(registration) => {
                registration.last_poll = at;
                false
            }
            None => {
                slaves.insert(slave_id.clone(), SlaveRegistration::new(at));
                true
            }
        }
    }

    pub fn get(&self, master_id: &MasterId, slave_id: &SlaveId) -> Option<SlaveRegistration> {
        self.slaves
            .get(master_id)
            .and_then(|slaves| slaves.get(slave_id).copied())
    }

    /// Slaves following a master, sorted by id.
    pub fn slaves_of(&self, master_id: &MasterId) -> Vec<SlaveId> {
        self.slaves
            .get(master_id)
            .map(|slaves| slaves.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of (master, slave) registrations.
    pub fn total(&self) -> usize {
        self.slaves.iter().map(|entry| entry.value().len()).sum()
    }
}

impl Default for SlaveRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn master(s: &str) -> MasterId {
        MasterId::try_new(s).unwrap()
    }

    fn slave(s: &str) -> SlaveId {
        SlaveId::try_new(s).unwrap()
    }

    #[test]
    fn test_register_is_idempotent_and_refreshes() {
        let registry = SlaveRegistry::new();
        let t0 = Utc::now();
        let t1 = t0 + Duration::seconds(30);

        registry.register(&master("M1"), &slave("S1"), t0);
        let refreshed = registry.register(&master("M1"), &slave("S1"), t1);

        assert_eq!(refreshed.registered_at, t1);
        assert_eq!(registry.get(&master("M1"), &slave("S1")), Some(refreshed));
        assert_eq!(registry.total(), 1);
    }

    #[test]
    fn test_touch_auto_registers() {
        let registry = SlaveRegistry::new();
        let t0 = Utc::now();
        let t1 = t0 + Duration::seconds(5);

        assert!(registry.touch(&master("M1"), &slave("S1"), t0));
        assert!(!registry.touch(&master("M1"), &slave("S1"), t1));

        let registration = registry.get(&master("M1"), &slave("S1")).unwrap();
        assert_eq!(registration.registered_at, t0);
        assert_eq!(registration.last_poll, t1);
    }

    #[test]
    fn test_slaves_of_sorted() {
        let registry = SlaveRegistry::new();
        let now = Utc::now();
        registry.register(&master("M1"), &slave("S2"), now);
        registry.register(&master("M1"), &slave("S1"), now);
        registry.register(&master("M2"), &slave("S3"), now);

        assert_eq!(registry.slaves_of(&master("M1")), vec![slave("S1"), slave("S2")]);
        assert!(registry.slaves_of(&master("M9")).is_empty());
        assert_eq!(registry.total(), 3);
    }
}
