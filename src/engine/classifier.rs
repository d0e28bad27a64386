//! Label Classifier
//!
//! Assigns the coarse triage label through a prioritized rule cascade,
//! falling back to score-based escalation when no rule fires. The cascade is
//! an explicit ordered slice so branch priority stays a testable artifact
//! rather than an accident of nesting.

use super::rules::{
    LOW_CONFIDENCE_MAX, OPEN_WOUND_SIZE_MM, REDNESS_SPREAD_PERCENT, SCORE_RED_MIN,
    SCORE_YELLOW_MIN,
};
use super::scorer::compute_risk_score;
use super::types::{Classification, SiteAnalysis, TriageLabel};

struct Rule {
    matches: fn(&SiteAnalysis) -> bool,
    label: TriageLabel,
    explanation: &'static str,
}

/// Priority order is load-bearing: first match wins.
const RULES: &[Rule] = &[
    Rule {
        matches: purulent_discharge,
        label: TriageLabel::Red,
        explanation: "Purulent discharge detected - urgent clinician review recommended.",
    },
    Rule {
        matches: spreading_redness_with_swelling,
        label: TriageLabel::Yellow,
        explanation: "Widespread redness with swelling - escalate for clinician review.",
    },
    Rule {
        matches: dressing_lift_with_local_signs,
        label: TriageLabel::Yellow,
        explanation: "Dressing lift with local signs - check dressing and review clinically.",
    },
    Rule {
        matches: large_open_wound,
        label: TriageLabel::Yellow,
        explanation: "Open wound >10mm - needs clinical attention.",
    },
    Rule {
        matches: low_confidence,
        label: TriageLabel::Uncertain,
        explanation: "Low confidence - request a clearer photo.",
    },
];

fn purulent_discharge(analysis: &SiteAnalysis) -> bool {
    analysis
        .features
        .feature("discharge")
        .map_or(false, |d| d.present && d.kind.as_deref() == Some("purulent"))
}

fn spreading_redness_with_swelling(analysis: &SiteAnalysis) -> bool {
    let spreading = analysis
        .features
        .feature("redness")
        .map_or(false, |r| r.present && r.extent_percent.unwrap_or(0.0) > REDNESS_SPREAD_PERCENT);
    spreading && analysis.features.present("swelling")
}

fn dressing_lift_with_local_signs(analysis: &SiteAnalysis) -> bool {
    analysis.features.present("dressing_lift")
        && (analysis.features.present("discharge") || analysis.features.present("redness"))
}

fn large_open_wound(analysis: &SiteAnalysis) -> bool {
    // Missing size reads as 0, so this never fires on an unsized wound
    analysis
        .features
        .feature("open_wound")
        .map_or(false, |w| w.present && w.size_mm.unwrap_or(0.0) > OPEN_WOUND_SIZE_MM)
}

fn low_confidence(analysis: &SiteAnalysis) -> bool {
    analysis.overall_confidence < LOW_CONFIDENCE_MAX
}

/// Classify one extraction result. Pure and total; `risk_score` is always
/// the raw scorer output regardless of which branch fired.
pub fn classify_label(analysis: &SiteAnalysis) -> Classification {
    let risk_score = compute_risk_score(&analysis.features);

    for rule in RULES {
        if (rule.matches)(analysis) {
            return Classification {
                label: rule.label,
                risk_score,
                explanation: rule.explanation.to_string(),
                overall_confidence: analysis.overall_confidence,
            };
        }
    }

    // No rule fired: default Green, escalated by the scorer's output
    let (label, explanation) = if risk_score >= SCORE_RED_MIN {
        (TriageLabel::Red, "Risk score high based on features - urgent review.")
    } else if risk_score >= SCORE_YELLOW_MIN {
        (TriageLabel::Yellow, "Moderate risk score - clinician review advised.")
    } else {
        (TriageLabel::Green, "No concerning signs detected.")
    };

    Classification {
        label,
        risk_score,
        explanation: explanation.to_string(),
        overall_confidence: analysis.overall_confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn analysis(features: serde_json::Value, confidence: f64) -> SiteAnalysis {
        SiteAnalysis::from_value(&json!({
            "image_id": "test.jpg",
            "features": features,
            "overall_confidence": confidence,
        }))
    }

    #[test]
    fn test_all_absent_is_green() {
        let result = classify_label(&analysis(json!({}), 0.9));
        assert_eq!(result.label, TriageLabel::Green);
        assert_eq!(result.risk_score, 0);
        assert_eq!(result.overall_confidence, 0.9);
    }

    #[test]
    fn test_purulent_discharge_is_red() {
        let result = classify_label(&analysis(
            json!({"discharge": {"present": true, "type": "purulent", "confidence": 0.9}}),
            0.9,
        ));
        assert_eq!(result.label, TriageLabel::Red);
        assert_eq!(result.risk_score, 60);
    }

    #[test]
    fn test_purulent_discharge_outranks_low_confidence() {
        let result = classify_label(&analysis(
            json!({"discharge": {"present": true, "type": "purulent", "confidence": 0.9}}),
            0.2,
        ));
        assert_eq!(result.label, TriageLabel::Red);
    }

    #[test]
    fn test_spreading_redness_with_swelling_is_yellow() {
        let result = classify_label(&analysis(
            json!({
                "redness": {"present": true, "extent_percent": 31.0, "confidence": 0.9},
                "swelling": {"present": true, "confidence": 0.85},
            }),
            0.9,
        ));
        assert_eq!(result.label, TriageLabel::Yellow);
        assert!(result.explanation.contains("redness"));
    }

    #[test]
    fn test_redness_at_threshold_does_not_fire() {
        // extent must exceed 30, and score 7 + 10 stays below escalation
        let result = classify_label(&analysis(
            json!({
                "redness": {"present": true, "extent_percent": 30.0, "confidence": 0.9},
                "swelling": {"present": true, "confidence": 0.85},
            }),
            0.9,
        ));
        assert_eq!(result.label, TriageLabel::Green);
    }

    #[test]
    fn test_dressing_lift_with_redness_is_yellow() {
        let result = classify_label(&analysis(
            json!({
                "dressing_lift": {"present": true, "confidence": 0.9},
                "redness": {"present": true, "confidence": 0.9},
            }),
            0.9,
        ));
        assert_eq!(result.label, TriageLabel::Yellow);
        assert!(result.explanation.contains("Dressing lift"));
    }

    #[test]
    fn test_dressing_lift_alone_is_green() {
        let result = classify_label(&analysis(
            json!({"dressing_lift": {"present": true, "confidence": 0.9}}),
            0.9,
        ));
        assert_eq!(result.label, TriageLabel::Green);
        assert_eq!(result.risk_score, 5);
    }

    #[test]
    fn test_large_open_wound_is_yellow() {
        let result = classify_label(&analysis(
            json!({"open_wound": {"present": true, "size_mm": 11.0, "confidence": 0.9}}),
            0.9,
        ));
        assert_eq!(result.label, TriageLabel::Yellow);
    }

    #[test]
    fn test_open_wound_missing_size_never_fires_rule() {
        // Open wound alone scores 20, below Yellow escalation, so Green
        let result = classify_label(&analysis(
            json!({"open_wound": {"present": true, "confidence": 0.9}}),
            0.9,
        ));
        assert_eq!(result.label, TriageLabel::Green);
        assert_eq!(result.risk_score, 20);
    }

    #[test]
    fn test_low_confidence_is_uncertain() {
        let result = classify_label(&analysis(json!({}), 0.49));
        assert_eq!(result.label, TriageLabel::Uncertain);

        let result = classify_label(&analysis(json!({}), 0.5));
        assert_eq!(result.label, TriageLabel::Green);
    }

    #[test]
    fn test_uncertain_is_not_score_escalated() {
        // Open wound + swelling scores 30 (>= Yellow escalation), but the
        // low-confidence rule fires first and sticks
        let result = classify_label(&analysis(
            json!({
                "open_wound": {"present": true, "confidence": 0.4},
                "swelling": {"present": true, "confidence": 0.4},
            }),
            0.3,
        ));
        assert_eq!(result.label, TriageLabel::Uncertain);
        assert_eq!(result.risk_score, 30);
    }

    #[test]
    fn test_score_escalation_boundaries() {
        // Exactly 25 -> Yellow
        let result = classify_label(&analysis(
            json!({
                "redness": {"present": true, "extent_percent": 20.0, "confidence": 0.9},
                "open_wound": {"present": true, "confidence": 0.9},
            }),
            0.9,
        ));
        assert_eq!(result.risk_score, 25);
        assert_eq!(result.label, TriageLabel::Yellow);

        // 24 stays Green
        let result = classify_label(&analysis(
            json!({
                "redness": {"present": true, "extent_percent": 16.0, "confidence": 0.9},
                "open_wound": {"present": true, "confidence": 0.9},
            }),
            0.9,
        ));
        assert_eq!(result.risk_score, 24);
        assert_eq!(result.label, TriageLabel::Green);
    }

    #[test]
    fn test_score_escalation_to_red() {
        // An out-of-range extent report is not clamped by the scorer, so a
        // lone redness finding can still reach the Red escalation band
        let result = classify_label(&analysis(
            json!({"redness": {"present": true, "extent_percent": 240.0, "confidence": 0.9}}),
            0.9,
        ));
        assert_eq!(result.risk_score, 60);
        assert_eq!(result.label, TriageLabel::Red);
        assert!(result.explanation.contains("Risk score high"));
    }

    #[test]
    fn test_identical_input_identical_output() {
        let input = analysis(
            json!({
                "redness": {"present": true, "extent_percent": 40.0, "confidence": 0.9},
                "swelling": {"present": true, "confidence": 0.85},
            }),
            0.88,
        );
        assert_eq!(classify_label(&input), classify_label(&input));
    }
}
