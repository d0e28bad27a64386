//! Vision service client
//!
//! HTTP client for the external feature extractor. The extractor's internals
//! are opaque: this client uploads the raw image and leniently parses
//! whatever JSON comes back into a `SiteAnalysis`, so a sloppy response
//! degrades to absent features instead of failing downstream.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Value};
use std::time::Duration;

use crate::engine::SiteAnalysis;

/// Vision service configuration
#[derive(Debug, Clone)]
pub struct VisionConfig {
    pub endpoint: String,
    pub api_key: String,
    pub timeout_seconds: u64,
}

pub struct VisionClient {
    config: VisionConfig,
    http_client: reqwest::Client,
}

#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Vision service returned status {0}")]
    Server(u16),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl VisionClient {
    pub fn new(config: VisionConfig) -> Result<Self, VisionError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| VisionError::Client(e.to_string()))?;

        Ok(Self { config, http_client })
    }

    /// Send one image for feature extraction.
    pub async fn analyze(&self, image: &[u8], filename: &str) -> Result<SiteAnalysis, VisionError> {
        let request = json!({
            "image_id": filename,
            "image_base64": BASE64.encode(image),
        });

        tracing::debug!("Sending {} bytes to vision service for {}", image.len(), filename);

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .header("x-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| VisionError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VisionError::Server(response.status().as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| VisionError::Parse(e.to_string()))?;

        Ok(SiteAnalysis::from_value(&body))
    }
}
