//! CathShield Backend Server
//!
//! Catheter-site risk assessment service.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    CATHSHIELD SERVER                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────┐  ┌──────────────────────┐ │
//! │  │  API      │  │  Risk Engine │  │  Vision Client       │ │
//! │  │  (Axum)   │  │  (pure)      │  │  (feature extractor) │ │
//! │  └─────┬─────┘  └──────┬───────┘  └──────────┬───────────┘ │
//! │        └───────────────┼──────────────────────┘             │
//! │                        ▼                                    │
//! │                ┌──────────────┐                             │
//! │                │ History file │                             │
//! │                └──────────────┘                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod analytics;
mod config;
mod engine;
mod error;
mod handlers;
mod history;
mod models;
mod vision;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

/// Uploaded images larger than this are rejected outright
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cathshield_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("CathShield Server starting...");
    tracing::info!("Storage: {}", config.storage_dir.display());
    tracing::info!("Vision endpoint: {}", config.vision_endpoint);

    let history = history::HistoryStore::open(&config.storage_dir, config.history_limit)
        .context("Failed to open history store")?;

    let vision = vision::VisionClient::new(vision::VisionConfig {
        endpoint: config.vision_endpoint.clone(),
        api_key: config.vision_api_key.clone(),
        timeout_seconds: config.vision_timeout_seconds,
    })
    .context("Failed to create vision client")?;

    let state = AppState {
        history: Arc::new(history),
        vision: Arc::new(vision),
        config: config.clone(),
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind listener")?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub history: Arc<history::HistoryStore>,
    pub vision: Arc<vision::VisionClient>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/analyze", post(handlers::analyze::analyze))
        .route("/api/v1/history", get(handlers::history::list))
        .route("/api/v1/history/image/:filename", get(handlers::history::image))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
