use crate::error::AppError;
use crate::models::UploadResponse;
use crate::state::AppState;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use copier_types::signal::SignalRequest;
use relay_engine::ingestion::IngestOutcome;

/// Master uploads a trade signal.
pub async fn upload_signal(
    State(state): State<AppState>,
    payload: Result<Json<SignalRequest>, JsonRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let response = match state.engine.ingest(request)? {
        IngestOutcome::Acknowledged { action, .. } => UploadResponse::Acknowledged {
            status: "acknowledged",
            action,
        },
        IngestOutcome::Queued(queued) => UploadResponse::Received {
            status: "received",
            master_id: queued.master_id,
            action: queued.action,
            ticket: queued.ticket,
            signal_id: queued.signal_id,
            disposition: queued.disposition,
        },
    };

    Ok(Json(response))
}
