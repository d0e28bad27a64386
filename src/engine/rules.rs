//! Risk Engine Rules & Thresholds
//!
//! Weights, thresholds, and fixed texts for the risk engine.
//! No logic here - scoring and branching live in `scorer.rs`,
//! `classifier.rs`, and `profile.rs`.

// ============================================================================
// FEATURE RISK SCORER WEIGHTS (additive, clamped to 0-100)
// ============================================================================

/// Purulent discharge dominates: near-automatic high score
pub const PURULENT_DISCHARGE_POINTS: i32 = 60;

/// Scaled by redness extent: floor(25 * extent_percent / 100)
pub const REDNESS_EXTENT_POINTS: i32 = 25;

pub const SWELLING_POINTS: i32 = 10;
pub const DRESSING_LIFT_POINTS: i32 = 5;
pub const OPEN_WOUND_POINTS: i32 = 20;

// ============================================================================
// CLASSIFIER THRESHOLDS
// ============================================================================

/// Redness extent (%) above which redness + swelling escalates to Yellow
pub const REDNESS_SPREAD_PERCENT: f64 = 30.0;

/// Open wound size (mm) above which the wound alone escalates to Yellow
pub const OPEN_WOUND_SIZE_MM: f64 = 10.0;

/// Below this overall confidence the result is Uncertain
pub const LOW_CONFIDENCE_MAX: f64 = 0.5;

/// Score at or above which a rule-less result escalates Green -> Red
pub const SCORE_RED_MIN: i32 = 60;

/// Score at or above which a rule-less result escalates Green -> Yellow
pub const SCORE_YELLOW_MIN: i32 = 25;

// ============================================================================
// PATIENT FACTOR WEIGHTS
// ============================================================================

/// Fixed weight per truthy patient factor. Immutable table; the profile
/// builder accepts an alternate table for testing via
/// `build_risk_profile_with_weights`.
pub const PATIENT_FACTOR_WEIGHTS: [(&str, i32); 4] = [
    ("agitation", 12),
    ("age_extremes", 9),
    ("comorbidities", 10),
    ("immune_nutrition", 9),
];

// ============================================================================
// LOCAL PENALTIES (early-window base)
// ============================================================================

pub const DRESSING_LIFT_PENALTY: f64 = 12.0;
pub const DISCHARGE_PENALTY: f64 = 10.0;
pub const OPEN_WOUND_PENALTY: f64 = 8.0;

// ============================================================================
// DWELL-TIME WINDOWS (days)
// ============================================================================

pub const EARLY_WINDOW_MAX_DAYS: f64 = 3.0;
pub const LATE_WINDOW_MAX_DAYS: f64 = 7.0;

// ============================================================================
// INTEGRATED RISK FORMULA WEIGHTS
// ============================================================================

/// CLISA contribution to the early-window base
pub const EARLY_CLISA_WEIGHT: f64 = 0.6;

/// Early-base contribution in the late window
pub const LATE_BASE_WEIGHT: f64 = 0.5;

/// Early-base contribution in the extended window
pub const EXTENDED_BASE_WEIGHT: f64 = 0.4;

/// Trend-delta contribution in the late/extended windows
pub const TREND_WEIGHT: f64 = 0.5;

/// Per-day dwell penalty past the early window
pub const DWELL_RISK_PER_DAY: f64 = 4.0;

/// Additional per-day penalty past the late window
pub const EXTENDED_PENALTY_PER_DAY: f64 = 6.0;

/// Points per traction yellow event
pub const TRACTION_YELLOW_POINTS: f64 = 5.0;

/// Venous trauma risk never exceeds this cap
pub const VENOUS_TRAUMA_CAP: f64 = 30.0;

// ============================================================================
// TIER THRESHOLDS (inclusive)
// ============================================================================

pub const TIER_HIGH_MIN: f64 = 65.0;
pub const TIER_MODERATE_MIN: f64 = 35.0;

// ============================================================================
// ALERT THRESHOLDS
// ============================================================================

/// CLISA score at or above which the clisa alert fires
pub const CLISA_ALERT_MIN: f64 = 70.0;

// ============================================================================
// RECOMMENDED ACTION THRESHOLDS & TEXTS
// ============================================================================

pub const URGENT_ACTION_MIN: f64 = 60.0;
pub const REINFORCE_ACTION_MIN: f64 = 30.0;

pub const ACTION_URGENT_REVIEW: &str = "Urgent clinician review and catheter assessment now";
pub const ACTION_REINFORCE_DRESSING: &str = "Reinforce dressing, reassess within 2 hours";
pub const ACTION_ROUTINE_SURVEILLANCE: &str = "Continue routine surveillance and document in 12 h";
