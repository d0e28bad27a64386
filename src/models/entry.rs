//! History entry model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::{Classification, RiskProfile, SiteAnalysis, SiteContext};

/// One persisted assessment: the full evaluation of a single uploaded image.
/// Stored newest-first in the history file; the most recent entry is the
/// "previous assessment" the engine's trend comparison runs against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub image_url: String,
    pub image_filename: String,
    pub original_filename: String,
    pub classification: Classification,
    pub analysis: SiteAnalysis,
    pub context: SiteContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_marker: Option<String>,
    pub risk_profile: RiskProfile,
}

impl HistoryEntry {
    /// Event marker for analytics: the entry-level marker wins over the one
    /// recorded inside the capture context
    pub fn effective_event_marker(&self) -> Option<&str> {
        self.event_marker
            .as_deref()
            .or(self.context.event_marker.as_deref())
    }
}
