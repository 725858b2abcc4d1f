use crate::error::AppError;
use crate::models::{PollQuery, PollResponse, RegisterSlaveRequest, RegisterSlaveResponse, require_pair};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};

/// Slave announces which master it copies.
pub async fn register_slave(
    State(state): State<AppState>,
    payload: Result<Json<RegisterSlaveRequest>, JsonRejection>,
) -> Result<Json<RegisterSlaveResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let (master_id, slave_id) = require_pair(request.master_id, request.slave_id)?;

    let registration = state.engine.register(&master_id, &slave_id);

    Ok(Json(RegisterSlaveResponse {
        status: "registered",
        slave_id,
        master_id,
        timestamp: registration.registered_at,
    }))
}

/// Slave asks for the next signal. Returns at most one.
pub async fn slave_poll(
    State(state): State<AppState>,
    Query(query): Query<PollQuery>,
) -> Result<Json<PollResponse>, AppError> {
    let (master_id, slave_id) = require_pair(query.master_id, query.slave_id)?;

    let signals: Vec<_> = state.engine.poll(&master_id, &slave_id).into_iter().collect();

    Ok(Json(PollResponse {
        status: "ok",
        count: signals.len(),
        signals,
        timestamp: state.engine.now(),
    }))
}
