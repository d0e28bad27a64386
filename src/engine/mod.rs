//! Risk Evaluation Engine
//!
//! Pure, deterministic pipeline: Feature Risk Scorer -> Label Classifier ->
//! Risk Profile Builder. No I/O, no clock reads, no shared mutable state;
//! every function is total over its input domain and safe to call
//! concurrently. Timestamp injection and previous-entry retrieval are the
//! caller's responsibility.

pub mod classifier;
pub mod input;
pub mod profile;
pub mod rules;
pub mod scorer;
pub mod types;

pub use classifier::classify_label;
pub use profile::{build_risk_profile, build_risk_profile_with_weights};
pub use scorer::compute_risk_score;
pub use types::{
    Alert, AlertSeverity, AlertType, Classification, FeatureObservation, FeatureSet, RiskProfile,
    RiskTier, RiskWindow, SiteAnalysis, SiteContext, TriageLabel,
};
