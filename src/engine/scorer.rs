//! Feature Risk Scorer
//!
//! Converts a feature set into a single bounded severity score (the CLISA
//! score). Additive weights, clamped to 0-100. Pure and total: malformed or
//! empty input scores 0.

use super::rules::{
    DRESSING_LIFT_POINTS, OPEN_WOUND_POINTS, PURULENT_DISCHARGE_POINTS, REDNESS_EXTENT_POINTS,
    SWELLING_POINTS,
};
use super::types::FeatureSet;

/// Compute the 0-100 severity score for one feature set.
///
/// Purulent discharge dominates; the remaining signs are minor additive
/// contributors, reflecting clinical severity ordering rather than a learned
/// weighting.
pub fn compute_risk_score(features: &FeatureSet) -> i32 {
    let mut score = 0;

    if let Some(discharge) = features.feature("discharge") {
        if discharge.present && discharge.kind.as_deref() == Some("purulent") {
            score += PURULENT_DISCHARGE_POINTS;
        }
    }

    if let Some(redness) = features.feature("redness") {
        if redness.present {
            if let Some(extent) = redness.extent_percent {
                score += (f64::from(REDNESS_EXTENT_POINTS) * extent / 100.0) as i32;
            }
        }
    }

    if features.present("swelling") {
        score += SWELLING_POINTS;
    }
    if features.present("dressing_lift") {
        score += DRESSING_LIFT_POINTS;
    }
    if features.present("open_wound") {
        score += OPEN_WOUND_POINTS;
    }

    score.clamp(0, 100)
}
