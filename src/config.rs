//! Configuration module

use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Root directory for history and image storage
    pub storage_dir: PathBuf,

    /// Maximum number of retained history entries
    pub history_limit: usize,

    /// Feature extractor endpoint
    pub vision_endpoint: String,

    /// Feature extractor API key
    pub vision_api_key: String,

    /// Feature extractor request timeout
    pub vision_timeout_seconds: u64,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5001),

            storage_dir: env::var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("storage")),

            history_limit: env::var("HISTORY_LIMIT")
                .ok()
                .and_then(|l| l.parse().ok())
                .unwrap_or(100),

            vision_endpoint: env::var("VISION_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:8602/v1/analyze".to_string()),

            vision_api_key: env::var("VISION_API_KEY").unwrap_or_default(),

            vision_timeout_seconds: env::var("VISION_TIMEOUT_SECONDS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(30),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
