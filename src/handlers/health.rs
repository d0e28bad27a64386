//! Health check handler

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    environment: String,
    /// Number of assessments currently retained in the history store
    history_entries: usize,
    timestamp: i64,
}

/// Liveness probe with a shallow look at the history store
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        history_entries: state.history.entries().len(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
