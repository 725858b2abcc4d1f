use crate::handlers::{admin, signal, slave};
use crate::state::AppState;
use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(admin::home))
        .route("/upload_signal", post(signal::upload_signal))
        .route("/register_slave", post(slave::register_slave))
        .route("/slave_poll", get(slave::slave_poll))
        .route("/clear_signals", post(admin::clear_signals))
        .route("/status", get(admin::status))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "Handler panicked");

    let body = Json(json!({
        "error": "INTERNAL_ERROR",
        "message": "Internal server error"
    }));
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}
