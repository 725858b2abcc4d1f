//! Trade lifecycle signals
//!
//! A master terminal uploads a [`SignalRequest`]. Once validated it becomes a
//! [`ValidatedSignal`], and once stamped by the relay a [`Signal`], which is
//! what slaves receive back unchanged.

use crate::errors::ValidationError;
use crate::ids::{MasterId, SignalId, Ticket};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Fields the relay owns on a queued signal; never taken from the payload.
const RESERVED_FIELDS: [&str; 2] = ["server_timestamp", "signal_id"];

/// Trade lifecycle action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Market position opened
    NewTrade,
    /// Pending order placed
    NewPending,
    /// Position stops/targets changed
    ModifyTrade,
    /// Pending order changed
    ModifyPending,
    /// Position closed (terminal)
    CloseTrade,
    /// Pending order removed (terminal)
    DeleteOrder,
    /// Connectivity check from a freshly started master
    InitTest,
    /// Keep-alive
    Heartbeat,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::NewTrade,
        Action::NewPending,
        Action::ModifyTrade,
        Action::ModifyPending,
        Action::CloseTrade,
        Action::DeleteOrder,
        Action::InitTest,
        Action::Heartbeat,
    ];

    /// Wire name of the action
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::NewTrade => "NEW_TRADE",
            Action::NewPending => "NEW_PENDING",
            Action::ModifyTrade => "MODIFY_TRADE",
            Action::ModifyPending => "MODIFY_PENDING",
            Action::CloseTrade => "CLOSE_TRADE",
            Action::DeleteOrder => "DELETE_ORDER",
            Action::InitTest => "INIT_TEST",
            Action::Heartbeat => "HEARTBEAT",
        }
    }

    pub fn requires_symbol(&self) -> bool {
        !matches!(
            self,
            Action::DeleteOrder | Action::InitTest | Action::Heartbeat
        )
    }

    /// Close/delete end a ticket's lifecycle
    pub fn is_terminal(&self) -> bool {
        matches!(self, Action::CloseTrade | Action::DeleteOrder)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidAction(s.to_string()))
    }
}

/// Signal as uploaded by a master, before validation
///
/// Every field the relay does not interpret lands in `payload` and is
/// forwarded to slaves untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalRequest {
    #[serde(default)]
    pub master_id: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub master_ticket: Option<Ticket>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl SignalRequest {
    /// Check required fields and resolve the action
    pub fn validate(self) -> Result<ValidatedSignal, ValidationError> {
        let master_id = self
            .master_id
            .and_then(MasterId::try_new)
            .ok_or(ValidationError::MissingField("master_id"))?;
        let action_name = self
            .action
            .filter(|a| !a.is_empty())
            .ok_or(ValidationError::MissingField("action"))?;
        let master_ticket = self
            .master_ticket
            .ok_or(ValidationError::MissingField("master_ticket"))?;

        let action: Action = action_name.parse()?;
        if action.requires_symbol() && self.symbol.is_none() {
            return Err(ValidationError::MissingSymbol(action));
        }

        let mut payload = self.payload;
        for field in RESERVED_FIELDS {
            payload.remove(field);
        }

        Ok(ValidatedSignal {
            master_id,
            action,
            master_ticket,
            symbol: self.symbol,
            payload,
        })
    }
}

/// Signal whose required fields have been checked
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSignal {
    pub master_id: MasterId,
    pub action: Action,
    pub master_ticket: Ticket,
    pub symbol: Option<String>,
    pub payload: Map<String, Value>,
}

/// Signal stamped by the relay and held in a master queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub master_id: MasterId,
    pub master_ticket: Ticket,
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub server_timestamp: DateTime<Utc>,
    pub signal_id: SignalId,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Signal {
    pub fn stamp(validated: ValidatedSignal, signal_id: SignalId, now: DateTime<Utc>) -> Self {
        Self {
            master_id: validated.master_id,
            master_ticket: validated.master_ticket,
            action: validated.action,
            symbol: validated.symbol,
            server_timestamp: now,
            signal_id,
            payload: validated.payload,
        }
    }

    /// Short `ticket(ACTION)` label for status listings
    pub fn label(&self) -> String {
        format!("{}({})", self.master_ticket, self.action)
    }
}
