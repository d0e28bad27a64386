//! Risk Engine Types
//!
//! Data structures only - no logic. Every record here is an immutable value
//! constructed fresh per evaluation; the engine keeps no state across calls.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// TRIAGE LABEL
// ============================================================================

/// Coarse triage classification for a catheter-site image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriageLabel {
    /// No concerning signs, routine surveillance
    Green,
    /// Local signs warranting clinician review
    Yellow,
    /// Urgent review required
    Red,
    /// Image/extraction confidence too low to call
    Uncertain,
}

impl TriageLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriageLabel::Green => "Green",
            TriageLabel::Yellow => "Yellow",
            TriageLabel::Red => "Red",
            TriageLabel::Uncertain => "Uncertain",
        }
    }
}

impl std::fmt::Display for TriageLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// RISK WINDOW / TIER
// ============================================================================

/// Dwell-time bucket selecting which integrated-risk formula applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskWindow {
    /// dwell <= 3 days
    Early,
    /// 3 < dwell <= 7 days
    Late,
    /// dwell > 7 days
    Extended,
}

impl RiskWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskWindow::Early => "early",
            RiskWindow::Late => "late",
            RiskWindow::Extended => "extended",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Moderate => "moderate",
            RiskTier::High => "high",
        }
    }
}

// ============================================================================
// ALERTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Traction,
    Dressing,
    Clisa,
    Integrated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Medium,
    High,
}

/// A discrete actionable alert emitted during profile construction.
/// Alerts are append-only and keep generation order; a single evaluation may
/// emit the same type more than once without deduplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertType,
    pub severity: AlertSeverity,
    pub reason: String,
    pub action: String,
    /// ISO-8601 UTC, injected by the caller (engine never reads the clock)
    pub timestamp: String,
}

// ============================================================================
// FEATURES (from the external vision service)
// ============================================================================

/// One observed image feature. All fields default to absent/zero; the lenient
/// boundary in `input.rs` guarantees the engine never sees malformed values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureObservation {
    #[serde(default)]
    pub present: bool,
    #[serde(default)]
    pub confidence: f64,
    /// Qualitative subtype, e.g. discharge `"purulent"`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

/// Feature-name -> observation mapping produced by the vision service.
/// Missing keys behave as an all-absent observation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(pub BTreeMap<String, FeatureObservation>);

impl FeatureSet {
    pub fn feature(&self, name: &str) -> Option<&FeatureObservation> {
        self.0.get(name)
    }

    pub fn present(&self, name: &str) -> bool {
        self.0.get(name).map_or(false, |f| f.present)
    }

    pub fn insert(&mut self, name: &str, observation: FeatureObservation) {
        self.0.insert(name.to_string(), observation);
    }
}

/// Full feature-extraction result for one image
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteAnalysis {
    #[serde(default)]
    pub image_id: String,
    #[serde(default)]
    pub features: FeatureSet,
    #[serde(default)]
    pub overall_confidence: f64,
    /// Label suggested by the vision model itself; advisory only, the
    /// classifier cascade is authoritative
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

// ============================================================================
// CONTEXT (dwell time, patient factors, device signals)
// ============================================================================

/// Normalized capture context. Built exclusively through
/// `SiteContext::from_value`, which coerces malformed input to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteContext {
    #[serde(default)]
    pub capture_type: String,
    #[serde(default)]
    pub capture_slot_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_marker: Option<String>,
    #[serde(default)]
    pub dwell_time_hours: f64,
    #[serde(default)]
    pub dwell_time_days: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_day_index: Option<i64>,
    #[serde(default)]
    pub traction_alerts: i64,
    /// None means the device never reported yellow events; the profile
    /// builder falls back to `traction_alerts`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traction_yellow_events: Option<i64>,
    #[serde(default)]
    pub traction_status: String,
    /// Factor name -> flag, already truthiness-normalized
    #[serde(default)]
    pub patient_factors: BTreeMap<String, bool>,
    #[serde(default)]
    pub night_mode: bool,
    #[serde(default)]
    pub picture_failed: bool,
}

// ============================================================================
// CLASSIFICATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: TriageLabel,
    /// Raw Feature Risk Scorer output, regardless of which rule fired
    pub risk_score: i32,
    pub explanation: String,
    pub overall_confidence: f64,
}

// ============================================================================
// RISK PROFILE
// ============================================================================

/// Integrated multi-factor risk assessment for one evaluation.
/// Serialized as the response payload and into history storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    /// Feature-derived severity, 0-100, 1 decimal
    pub clisa_score: f64,
    pub clisa_action: String,
    pub risk_window: RiskWindow,
    /// Integrated risk value, 0-100, 1 decimal
    pub risk_meter: f64,
    pub risk_tier: RiskTier,
    pub risk_label: TriageLabel,
    pub traction_alerts: i64,
    pub venous_trauma_risk: f64,
    pub dwell_time_days: f64,
    /// Upward-only CLISA drift versus the previous assessment
    pub trend_delta: f64,
    pub patient_factor_score: i32,
    pub patient_factors: BTreeMap<String, bool>,
    pub alerts: Vec<Alert>,
}
