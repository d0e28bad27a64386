//! History handlers

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::analytics::{calculate_analytics, HistoryAnalytics};
use crate::models::HistoryEntry;
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub entries: Vec<HistoryEntry>,
    pub analytics: HistoryAnalytics,
}

/// List stored assessments, newest first, with aggregate metrics
pub async fn list(State(state): State<AppState>) -> AppResult<Json<HistoryResponse>> {
    let entries = state.history.entries();
    let analytics = calculate_analytics(&entries);
    Ok(Json(HistoryResponse { entries, analytics }))
}

/// Serve one stored image
pub async fn image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let path = state
        .history
        .image_path(&filename)
        .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

    let bytes = tokio::fs::read(path).await?;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response())
}
