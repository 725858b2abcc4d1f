use crate::models::{ClearRequest, ClearResponse, HomeResponse, SERVICE_NAME, StatusResponse};
use crate::state::AppState;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use copier_types::ids::{MasterId, SlaveId};

/// Drop a master's queue and/or a slave's delivery history.
///
/// Never fails: a missing or unreadable body clears nothing.
pub async fn clear_signals(
    State(state): State<AppState>,
    payload: Result<Json<ClearRequest>, JsonRejection>,
) -> Json<ClearResponse> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let master_id = request.master_id.and_then(MasterId::try_new);
    let slave_id = request.slave_id.and_then(SlaveId::try_new);

    let cleared = state.engine.clear(master_id.as_ref(), slave_id.as_ref());
    let status = if cleared.is_empty() {
        "nothing_to_clear"
    } else {
        "cleared"
    };

    Json(ClearResponse { status, cleared })
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
        snapshot: state.engine.status(),
    })
}

pub async fn home(State(state): State<AppState>) -> Json<HomeResponse> {
    Json(HomeResponse {
        status: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        stats: state.engine.overview(),
    })
}
