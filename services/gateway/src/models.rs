use chrono::{DateTime, Utc};
use copier_types::errors::ValidationError;
use copier_types::ids::{MasterId, SignalId, SlaveId, Ticket};
use copier_types::signal::{Action, Signal};
use relay_engine::admin::ClearReport;
use relay_engine::master_queue::Disposition;
use relay_engine::status::{Overview, StatusSnapshot};
use serde::{Deserialize, Serialize};

pub const SERVICE_NAME: &str = "MT5 Trade Copier Relay";

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum UploadResponse {
    Received {
        status: &'static str,
        master_id: MasterId,
        action: Action,
        ticket: Ticket,
        signal_id: SignalId,
        disposition: Disposition,
    },
    Acknowledged {
        status: &'static str,
        action: Action,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterSlaveRequest {
    #[serde(default)]
    pub slave_id: Option<String>,
    #[serde(default)]
    pub master_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterSlaveResponse {
    pub status: &'static str,
    pub slave_id: SlaveId,
    pub master_id: MasterId,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PollQuery {
    pub slave_id: Option<String>,
    pub master_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PollResponse {
    pub status: &'static str,
    pub signals: Vec<Signal>,
    pub count: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClearRequest {
    #[serde(default)]
    pub master_id: Option<String>,
    #[serde(default)]
    pub slave_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub cleared: ClearReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(flatten)]
    pub snapshot: StatusSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub stats: Overview,
}

/// Resolve a required `(master_id, slave_id)` pair.
pub fn require_pair(
    master_id: Option<String>,
    slave_id: Option<String>,
) -> Result<(MasterId, SlaveId), ValidationError> {
    let slave_id = slave_id
        .and_then(SlaveId::try_new)
        .ok_or(ValidationError::MissingField("slave_id"))?;
    let master_id = master_id
        .and_then(MasterId::try_new)
        .ok_or(ValidationError::MissingField("master_id"))?;
    Ok((master_id, slave_id))
}
