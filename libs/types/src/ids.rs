//! Identifier types for relay entities
//!
//! Master and slave ids are free-form strings chosen by the trading terminals.
//! Signal ids are generated by the relay and are opaque to everyone else.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a master terminal broadcasting signals
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MasterId(String);

impl MasterId {
    /// Create a MasterId, returning None for an empty string
    pub fn try_new(id: impl Into<String>) -> Option<Self> {
        let s = id.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MasterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a slave terminal polling for signals
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlaveId(String);

impl SlaveId {
    /// Create a SlaveId, returning None for an empty string
    pub fn try_new(id: impl Into<String>) -> Option<Self> {
        let s = id.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlaveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier of a queued signal
///
/// Only ever compared for equality. The relay builds it from the ticket,
/// the action, the ingestion time in milliseconds and a process-wide
/// sequence number, but nothing may rely on that layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalId(String);

impl SignalId {
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Master-side order/position identifier
///
/// Terminals send either a number or a string. The two forms are kept apart:
/// `5` and `"5"` are different tickets.
///
/// Integers that fit `i64` always land in `Number`; `Unsigned` only holds
/// values above `i64::MAX`, so each integer has exactly one representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ticket {
    Number(i64),
    Unsigned(u64),
    Text(String),
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ticket::Number(n) => write!(f, "{}", n),
            Ticket::Unsigned(n) => write!(f, "{}", n),
            Ticket::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Ticket {
    fn from(n: i64) -> Self {
        Ticket::Number(n)
    }
}

impl From<u64> for Ticket {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(n) => Ticket::Number(n),
            Err(_) => Ticket::Unsigned(n),
        }
    }
}

impl From<&str> for Ticket {
    fn from(s: &str) -> Self {
        Ticket::Text(s.to_string())
    }
}
