//! Analyze handler
//!
//! Multipart intake for one catheter-site image plus its capture context,
//! orchestrating the pipeline: feature extraction, classification, risk
//! profile, persistence. All input leniency beyond basic upload validation
//! lives in the engine's input boundary; persistence failures are logged
//! and never fail the response.

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::engine::{
    build_risk_profile, classify_label, Classification, RiskProfile, SiteAnalysis, SiteContext,
};
use crate::models::HistoryEntry;
use crate::{AppError, AppResult, AppState};

const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub request_id: Uuid,
    pub analysis: SiteAnalysis,
    pub classification: Classification,
    pub risk_profile: RiskProfile,
    pub context: SiteContext,
    pub history_entry: HistoryEntry,
}

/// Evaluate one uploaded image
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<AnalyzeResponse>> {
    let request_id = Uuid::new_v4();
    tracing::info!("[{}] Analyze request received", request_id);

    let previous_entry = state.history.latest();

    let upload = read_upload(multipart).await?;
    let context = parse_context(request_id, upload.context_raw.as_deref());

    let analysis = state
        .vision
        .analyze(&upload.image, &upload.filename)
        .await
        .map_err(|e| {
            tracing::error!("[{}] Analysis failed: {}", request_id, e);
            AppError::from(e)
        })?;

    let classification = classify_label(&analysis);

    // Resolve the evaluation timestamp once; the engine never reads a clock
    let now = Utc::now();
    let risk_profile = build_risk_profile(
        &analysis.features,
        &classification,
        &context,
        previous_entry.as_ref().map(|e| &e.risk_profile),
        now,
    );

    let stored_filename = format!("{request_id}.jpg");
    if let Err(e) = state.history.save_image(&stored_filename, &upload.image) {
        tracing::warn!("[{}] Failed to persist image: {}", request_id, e);
    }

    let history_entry = HistoryEntry {
        id: request_id,
        timestamp: now,
        image_url: format!("/api/v1/history/image/{stored_filename}"),
        image_filename: stored_filename,
        original_filename: upload.filename,
        classification: classification.clone(),
        analysis: analysis.clone(),
        context: context.clone(),
        event_marker: context.event_marker.clone(),
        risk_profile: risk_profile.clone(),
    };
    if let Err(e) = state.history.append(history_entry.clone()) {
        tracing::warn!("[{}] Failed to persist history entry: {}", request_id, e);
    }

    tracing::info!(
        "[{}] Analysis complete with label {}",
        request_id,
        classification.label
    );

    Ok(Json(AnalyzeResponse {
        request_id,
        analysis,
        classification,
        risk_profile,
        context,
        history_entry,
    }))
}

struct Upload {
    filename: String,
    image: Bytes,
    context_raw: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> AppResult<Upload> {
    let mut image: Option<(String, Bytes)> = None;
    let mut context_raw = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                if filename.is_empty() {
                    return Err(AppError::ValidationError("Filename missing".to_string()));
                }

                let content_type = field.content_type().unwrap_or_default().to_string();
                if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
                    return Err(AppError::ValidationError(
                        "Unsupported image format".to_string(),
                    ));
                }

                let bytes = field.bytes().await?;
                if bytes.is_empty() {
                    return Err(AppError::ValidationError("Empty file payload".to_string()));
                }
                image = Some((filename, bytes));
            }
            "context" => {
                context_raw = Some(field.text().await?);
            }
            _ => {}
        }
    }

    let (filename, image) =
        image.ok_or_else(|| AppError::ValidationError("No image uploaded".to_string()))?;

    Ok(Upload {
        filename,
        image,
        context_raw,
    })
}

/// Invalid context JSON is logged and ignored, matching the lenient input
/// contract: the evaluation proceeds with an empty context.
fn parse_context(request_id: Uuid, raw: Option<&str>) -> SiteContext {
    let payload = raw
        .map(|text| match serde_json::from_str::<Value>(text) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("[{}] Invalid context payload, ignoring: {}", request_id, e);
                Value::Null
            }
        })
        .unwrap_or(Value::Null);

    SiteContext::from_value(&payload)
}
