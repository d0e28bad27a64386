//! Lenient Input Boundary
//!
//! All parse-with-default coercion for the heterogeneous JSON the service
//! receives lives here, so the engine's arithmetic never deals with
//! absent-or-wrong-typed values. Nothing in this module can fail: malformed
//! numerics become 0, malformed objects become empty, malformed flags become
//! false.

use serde_json::Value;
use std::collections::BTreeMap;

use super::types::{FeatureObservation, FeatureSet, SiteAnalysis, SiteContext};

/// Feature keys the vision service is contracted to report
pub const FEATURE_KEYS: [&str; 10] = [
    "redness",
    "swelling",
    "dressing_lift",
    "discharge",
    "exposed_catheter",
    "open_wound",
    "bruising",
    "crusting",
    "erythema_border_sharp",
    "fluctuance",
];

/// Coerce a value into a float: numbers pass through, numeric strings parse,
/// everything else yields the default.
pub fn lenient_f64(value: Option<&Value>, default: f64) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

/// Coerce a value into an integer; floats truncate toward zero.
pub fn lenient_i64(value: Option<&Value>, default: i64) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

/// Truthiness across the value shapes patient factors arrive in: booleans
/// pass through, strings match `true`/`1`/`yes`/`y` case-insensitively,
/// numbers are true when nonzero, containers when nonempty.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "y"
        ),
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Null => false,
    }
}

/// Strictly-numeric optional field: strings do not count as measurements.
fn numeric_opt(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}

fn string_opt(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

impl FeatureObservation {
    /// Build one observation from an arbitrary JSON value. Non-object input
    /// yields the all-absent default.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        // One legacy feature reports presence under "yes" instead of "present"
        let present = obj
            .get("present")
            .or_else(|| obj.get("yes"))
            .map_or(false, truthy);

        Self {
            present,
            confidence: lenient_f64(obj.get("confidence"), 0.0).clamp(0.0, 1.0),
            kind: string_opt(obj.get("type")),
            extent_percent: numeric_opt(obj.get("extent_percent")),
            size_mm: numeric_opt(obj.get("size_mm")),
            amount: string_opt(obj.get("amount")),
        }
    }
}

impl FeatureSet {
    /// Build the feature map from an arbitrary JSON value, keeping only the
    /// contracted feature keys. Non-object input yields an empty set.
    pub fn from_value(value: &Value) -> Self {
        let mut features = BTreeMap::new();
        if let Some(obj) = value.as_object() {
            for key in FEATURE_KEYS {
                if let Some(raw) = obj.get(key) {
                    features.insert(key.to_string(), FeatureObservation::from_value(raw));
                }
            }
        }
        Self(features)
    }
}

impl SiteAnalysis {
    /// Parse a vision-service response. Total: any JSON shape yields a valid
    /// (possibly all-absent) analysis.
    pub fn from_value(value: &Value) -> Self {
        let obj = value.as_object();
        let get = |key: &str| obj.and_then(|o| o.get(key));

        Self {
            image_id: string_opt(get("image_id")).unwrap_or_default(),
            features: get("features").map(FeatureSet::from_value).unwrap_or_default(),
            overall_confidence: lenient_f64(get("overall_confidence"), 0.0),
            recommended_label: string_opt(get("recommended_label")),
            explanation: string_opt(get("explanation")),
        }
    }
}

impl SiteContext {
    /// Normalize the caller-supplied context payload. Dwell days derive from
    /// hours when not reported as a number; the line day index derives from
    /// hours when absent. Counts and durations clamp at zero.
    pub fn from_value(value: &Value) -> Self {
        let obj = value.as_object();
        let get = |key: &str| obj.and_then(|o| o.get(key));

        let dwell_hours = lenient_f64(get("dwell_time_hours"), 0.0).max(0.0);
        let dwell_days = get("dwell_time_days")
            .and_then(Value::as_f64)
            .unwrap_or(if dwell_hours > 0.0 { dwell_hours / 24.0 } else { 0.0 })
            .max(0.0);

        let line_day_index = get("line_day_index").and_then(Value::as_i64).or_else(|| {
            if dwell_hours > 0.0 {
                Some((dwell_hours / 24.0).ceil() as i64)
            } else {
                None
            }
        });

        let traction_yellow_events = match get("traction_yellow_events") {
            Some(raw @ (Value::Number(_) | Value::String(_))) => {
                Some(lenient_i64(Some(raw), 0).max(0))
            }
            _ => None,
        };

        let patient_factors = get("patient_factors")
            .and_then(Value::as_object)
            .map(|factors| {
                factors
                    .iter()
                    .map(|(name, flag)| (name.clone(), truthy(flag)))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            capture_type: string_opt(get("capture_type"))
                .unwrap_or_else(|| "catheter_site".to_string()),
            capture_slot_label: string_opt(get("capture_slot_label")).unwrap_or_default(),
            event_marker: string_opt(get("event_marker")),
            dwell_time_hours: dwell_hours,
            dwell_time_days: dwell_days,
            line_day_index,
            traction_alerts: lenient_i64(get("traction_alerts"), 0).max(0),
            traction_yellow_events,
            traction_status: string_opt(get("traction_status"))
                .unwrap_or_default()
                .to_ascii_lowercase(),
            patient_factors,
            night_mode: get("night_mode").map_or(false, truthy),
            picture_failed: get("picture_failed").map_or(false, truthy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lenient_f64_accepts_numbers_and_numeric_strings() {
        assert_eq!(lenient_f64(Some(&json!(2.5)), 0.0), 2.5);
        assert_eq!(lenient_f64(Some(&json!("3.5")), 0.0), 3.5);
        assert_eq!(lenient_f64(Some(&json!(" 4 ")), 0.0), 4.0);
        assert_eq!(lenient_f64(Some(&json!("abc")), 0.0), 0.0);
        assert_eq!(lenient_f64(Some(&json!([1, 2])), 0.0), 0.0);
        assert_eq!(lenient_f64(None, 1.5), 1.5);
    }

    #[test]
    fn test_lenient_i64_truncates_floats() {
        assert_eq!(lenient_i64(Some(&json!(2.9)), 0), 2);
        assert_eq!(lenient_i64(Some(&json!("7")), 0), 7);
        assert_eq!(lenient_i64(Some(&json!("7.5")), 0), 0);
        assert_eq!(lenient_i64(Some(&json!(null)), 3), 3);
    }

    #[test]
    fn test_truthy_string_forms() {
        for value in ["true", "TRUE", "1", "yes", "Y", " y "] {
            assert!(truthy(&json!(value)), "{value} should be truthy");
        }
        for value in ["false", "0", "no", "", "maybe"] {
            assert!(!truthy(&json!(value)), "{value} should be falsy");
        }
        assert!(truthy(&json!(true)));
        assert!(truthy(&json!(2)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!(null)));
    }

    #[test]
    fn test_feature_observation_from_malformed_value() {
        assert_eq!(FeatureObservation::from_value(&json!("redness")), FeatureObservation::default());
        assert_eq!(FeatureObservation::from_value(&json!(null)), FeatureObservation::default());

        // Non-numeric measurements are treated as absent, presence survives
        let obs = FeatureObservation::from_value(&json!({
            "present": "yes",
            "extent_percent": "forty",
            "size_mm": null,
            "confidence": 1.7,
        }));
        assert!(obs.present);
        assert_eq!(obs.extent_percent, None);
        assert_eq!(obs.size_mm, None);
        assert_eq!(obs.confidence, 1.0);
    }

    #[test]
    fn test_feature_observation_legacy_yes_flag() {
        let obs = FeatureObservation::from_value(&json!({"yes": true, "confidence": 0.9}));
        assert!(obs.present);
    }

    #[test]
    fn test_feature_set_ignores_unknown_keys() {
        let set = FeatureSet::from_value(&json!({
            "redness": {"present": true, "extent_percent": 30.0, "confidence": 0.9},
            "not_a_feature": {"present": true},
        }));
        assert!(set.present("redness"));
        assert!(set.feature("not_a_feature").is_none());
        assert!(!set.present("swelling"));
    }

    #[test]
    fn test_site_analysis_total_over_garbage() {
        let analysis = SiteAnalysis::from_value(&json!([1, 2, 3]));
        assert_eq!(analysis.overall_confidence, 0.0);
        assert!(analysis.features.0.is_empty());
    }

    #[test]
    fn test_context_derives_days_from_hours() {
        let ctx = SiteContext::from_value(&json!({"dwell_time_hours": 48.0}));
        assert_eq!(ctx.dwell_time_days, 2.0);
        assert_eq!(ctx.line_day_index, Some(2));

        // Explicit numeric days wins over the derivation
        let ctx = SiteContext::from_value(&json!({
            "dwell_time_hours": 48.0,
            "dwell_time_days": 5.5,
        }));
        assert_eq!(ctx.dwell_time_days, 5.5);
    }

    #[test]
    fn test_context_non_numeric_days_falls_back_to_hours() {
        let ctx = SiteContext::from_value(&json!({
            "dwell_time_hours": 30.0,
            "dwell_time_days": "soon",
        }));
        assert_eq!(ctx.dwell_time_days, 1.25);
    }

    #[test]
    fn test_context_yellow_events_absent_vs_zero() {
        let ctx = SiteContext::from_value(&json!({"traction_alerts": 4}));
        assert_eq!(ctx.traction_yellow_events, None);

        let ctx = SiteContext::from_value(&json!({
            "traction_alerts": 4,
            "traction_yellow_events": 0,
        }));
        assert_eq!(ctx.traction_yellow_events, Some(0));

        let ctx = SiteContext::from_value(&json!({"traction_yellow_events": {"bad": true}}));
        assert_eq!(ctx.traction_yellow_events, None);
    }

    #[test]
    fn test_context_clamps_negative_counts() {
        let ctx = SiteContext::from_value(&json!({
            "traction_alerts": -3,
            "dwell_time_days": -1.0,
        }));
        assert_eq!(ctx.traction_alerts, 0);
        assert_eq!(ctx.dwell_time_days, 0.0);
    }

    #[test]
    fn test_context_malformed_patient_factors() {
        let ctx = SiteContext::from_value(&json!({"patient_factors": "agitation"}));
        assert!(ctx.patient_factors.is_empty());

        let ctx = SiteContext::from_value(&json!({
            "patient_factors": {"agitation": "yes", "comorbidities": false},
        }));
        assert_eq!(ctx.patient_factors.get("agitation"), Some(&true));
        assert_eq!(ctx.patient_factors.get("comorbidities"), Some(&false));
    }

    #[test]
    fn test_context_normalizes_traction_status() {
        let ctx = SiteContext::from_value(&json!({"traction_status": "RED"}));
        assert_eq!(ctx.traction_status, "red");
    }

    #[test]
    fn test_context_total_over_garbage() {
        let ctx = SiteContext::from_value(&json!(42));
        assert_eq!(ctx, SiteContext {
            capture_type: "catheter_site".to_string(),
            ..SiteContext::default()
        });
    }
}
