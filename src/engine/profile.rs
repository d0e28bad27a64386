//! Risk Profile Builder
//!
//! Combines the scorer output, patient-factor weights, device/traction
//! signals, dwell-time windowing, and trend comparison against a prior
//! assessment into the integrated risk profile. Pure given its inputs: the
//! evaluation timestamp is injected by the caller, never read from a clock.

use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;

use super::rules::{
    ACTION_REINFORCE_DRESSING, ACTION_ROUTINE_SURVEILLANCE, ACTION_URGENT_REVIEW, CLISA_ALERT_MIN,
    DISCHARGE_PENALTY, DRESSING_LIFT_PENALTY, DWELL_RISK_PER_DAY, EARLY_CLISA_WEIGHT,
    EARLY_WINDOW_MAX_DAYS, EXTENDED_BASE_WEIGHT, EXTENDED_PENALTY_PER_DAY, LATE_BASE_WEIGHT,
    LATE_WINDOW_MAX_DAYS, OPEN_WOUND_PENALTY, PATIENT_FACTOR_WEIGHTS, REINFORCE_ACTION_MIN,
    TIER_HIGH_MIN, TIER_MODERATE_MIN, TRACTION_YELLOW_POINTS, TREND_WEIGHT, URGENT_ACTION_MIN,
    VENOUS_TRAUMA_CAP,
};
use super::scorer::compute_risk_score;
use super::types::{
    Alert, AlertSeverity, AlertType, Classification, FeatureSet, RiskProfile, RiskTier,
    RiskWindow, SiteContext, TriageLabel,
};

/// Build the integrated risk profile with the standard patient-factor table.
pub fn build_risk_profile(
    features: &FeatureSet,
    classification: &Classification,
    context: &SiteContext,
    previous: Option<&RiskProfile>,
    now: DateTime<Utc>,
) -> RiskProfile {
    build_risk_profile_with_weights(
        features,
        classification,
        context,
        previous,
        now,
        &PATIENT_FACTOR_WEIGHTS,
    )
}

/// Build the profile with a caller-supplied patient-factor weight table.
pub fn build_risk_profile_with_weights(
    features: &FeatureSet,
    classification: &Classification,
    context: &SiteContext,
    previous: Option<&RiskProfile>,
    now: DateTime<Utc>,
    factor_weights: &[(&str, i32)],
) -> RiskProfile {
    let clisa_score = f64::from(compute_risk_score(features));
    let dwell_days = context.dwell_time_days.max(0.0);
    let traction_alerts = context.traction_alerts.max(0);

    let mut factor_score = 0;
    let mut patient_factors = BTreeMap::new();
    for (name, weight) in factor_weights {
        let flagged = context.patient_factors.get(*name).copied().unwrap_or(false);
        patient_factors.insert((*name).to_string(), flagged);
        if flagged {
            factor_score += weight;
        }
    }

    let dressing_penalty = local_penalty(features, "dressing_lift", DRESSING_LIFT_PENALTY);
    let discharge_penalty = local_penalty(features, "discharge", DISCHARGE_PENALTY);
    let open_wound_penalty = local_penalty(features, "open_wound", OPEN_WOUND_PENALTY);

    let early_base = (clisa_score * EARLY_CLISA_WEIGHT
        + f64::from(factor_score)
        + dressing_penalty
        + discharge_penalty
        + open_wound_penalty)
        .min(100.0);

    let traction_yellows = context.traction_yellow_events.unwrap_or(traction_alerts).max(0);
    let venous_trauma_risk = (traction_yellows as f64 * TRACTION_YELLOW_POINTS).min(VENOUS_TRAUMA_CAP);

    let dwell_risk = if dwell_days > EARLY_WINDOW_MAX_DAYS {
        (dwell_days - EARLY_WINDOW_MAX_DAYS) * DWELL_RISK_PER_DAY
    } else {
        0.0
    };
    let extended_penalty = if dwell_days > LATE_WINDOW_MAX_DAYS {
        (dwell_days - LATE_WINDOW_MAX_DAYS) * EXTENDED_PENALTY_PER_DAY
    } else {
        0.0
    };

    // Only upward drift counts: improvement neither rewards nor penalizes
    let trend_delta = previous.map_or(0.0, |prev| (clisa_score - prev.clisa_score).max(0.0));

    let timestamp = now.to_rfc3339_opts(SecondsFormat::Micros, true);
    let mut alerts = Vec::new();

    if context.traction_status == "red" {
        alerts.push(Alert {
            kind: AlertType::Traction,
            severity: AlertSeverity::High,
            reason: "Traction device flagged possible dislodgement".to_string(),
            action: "Inspect the line and securement immediately".to_string(),
            timestamp: timestamp.clone(),
        });
    }

    if features.present("dressing_lift") {
        alerts.push(Alert {
            kind: AlertType::Dressing,
            severity: AlertSeverity::Medium,
            reason: "Dressing failure detected".to_string(),
            action: "Replace dressing and reassess".to_string(),
            timestamp: timestamp.clone(),
        });
    }

    if clisa_score >= CLISA_ALERT_MIN {
        alerts.push(Alert {
            kind: AlertType::Clisa,
            severity: AlertSeverity::High,
            reason: "CLISA score exceeded critical range".to_string(),
            action: "Escalate to clinician and document".to_string(),
            timestamp: timestamp.clone(),
        });
    }

    let (risk_window, integrated) = if dwell_days <= EARLY_WINDOW_MAX_DAYS {
        (RiskWindow::Early, early_base)
    } else if dwell_days <= LATE_WINDOW_MAX_DAYS {
        (
            RiskWindow::Late,
            (early_base * LATE_BASE_WEIGHT + venous_trauma_risk + dwell_risk + trend_delta * TREND_WEIGHT)
                .min(100.0),
        )
    } else {
        (
            RiskWindow::Extended,
            (early_base * EXTENDED_BASE_WEIGHT
                + venous_trauma_risk
                + dwell_risk
                + extended_penalty
                + trend_delta * TREND_WEIGHT)
                .min(100.0),
        )
    };

    let (risk_tier, risk_label) = if integrated >= TIER_HIGH_MIN {
        (RiskTier::High, TriageLabel::Red)
    } else if integrated >= TIER_MODERATE_MIN {
        (RiskTier::Moderate, TriageLabel::Yellow)
    } else {
        (RiskTier::Low, TriageLabel::Green)
    };

    // Appended last, after the tier is known
    if risk_tier == RiskTier::High {
        alerts.push(Alert {
            kind: AlertType::Integrated,
            severity: AlertSeverity::High,
            reason: "High CLABSI risk predicted".to_string(),
            action: "Initiate escalation protocol".to_string(),
            timestamp,
        });
    }

    RiskProfile {
        clisa_score: round1(clisa_score),
        clisa_action: recommended_action(clisa_score, classification.label).to_string(),
        risk_window,
        risk_meter: round1(integrated),
        risk_tier,
        risk_label,
        traction_alerts,
        venous_trauma_risk: round1(venous_trauma_risk),
        dwell_time_days: round2(dwell_days),
        trend_delta: round1(trend_delta),
        patient_factor_score: factor_score,
        patient_factors,
        alerts,
    }
}

fn local_penalty(features: &FeatureSet, name: &str, penalty: f64) -> f64 {
    if features.present(name) {
        penalty
    } else {
        0.0
    }
}

fn recommended_action(clisa_score: f64, label: TriageLabel) -> &'static str {
    if clisa_score >= URGENT_ACTION_MIN || label == TriageLabel::Red {
        ACTION_URGENT_REVIEW
    } else if clisa_score >= REINFORCE_ACTION_MIN || label == TriageLabel::Yellow {
        ACTION_REINFORCE_DRESSING
    } else {
        ACTION_ROUTINE_SURVEILLANCE
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
