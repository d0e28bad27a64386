//! History analytics
//!
//! Aggregate line metrics over the stored assessment entries, served with
//! the history listing. This layer owns the fallback from day tracking to
//! entry counts; the risk engine never sees it.

use serde::Serialize;
use std::collections::HashSet;

use crate::models::HistoryEntry;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryAnalytics {
    /// High-tier assessments per line day, 3 decimals
    pub clabsi_rate: f64,
    pub line_days: usize,
    pub clabsi_cases: usize,
    pub dressing_events: usize,
    pub catheter_events: usize,
    pub traction_alerts_total: i64,
}

impl Default for HistoryAnalytics {
    fn default() -> Self {
        Self {
            clabsi_rate: 0.0,
            line_days: 0,
            clabsi_cases: 0,
            dressing_events: 0,
            catheter_events: 0,
            traction_alerts_total: 0,
        }
    }
}

pub fn calculate_analytics(entries: &[HistoryEntry]) -> HistoryAnalytics {
    if entries.is_empty() {
        return HistoryAnalytics::default();
    }

    let mut unique_days = HashSet::new();
    let mut analytics = HistoryAnalytics::default();

    for entry in entries {
        if let Some(day) = entry.context.line_day_index {
            if day > 0 {
                unique_days.insert(day);
            }
        }

        match entry.effective_event_marker() {
            Some("dressing_change") => analytics.dressing_events += 1,
            Some("catheter_change") => analytics.catheter_events += 1,
            _ => {}
        }

        analytics.traction_alerts_total += entry.risk_profile.traction_alerts.max(0);

        if entry.risk_profile.risk_tier == crate::engine::RiskTier::High {
            analytics.clabsi_cases += 1;
        }
    }

    // Fall back to the entry count when day tracking is absent
    let line_days = if unique_days.is_empty() {
        entries.len()
    } else {
        unique_days.len()
    };
    analytics.line_days = line_days;
    analytics.clabsi_rate = if line_days > 0 {
        round3(analytics.clabsi_cases as f64 / line_days as f64)
    } else {
        0.0
    };

    analytics
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{RiskTier, SiteContext};
    use serde_json::json;

    fn entry(line_day: Option<i64>, tier: RiskTier, marker: Option<&str>, traction: i64) -> HistoryEntry {
        use crate::engine::{Classification, RiskProfile, RiskWindow, SiteAnalysis, TriageLabel};
        use std::collections::BTreeMap;

        let mut context = SiteContext::from_value(&json!({}));
        context.line_day_index = line_day;
        HistoryEntry {
            id: uuid::Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
            image_url: String::new(),
            image_filename: String::new(),
            original_filename: String::new(),
            classification: Classification {
                label: TriageLabel::Green,
                risk_score: 0,
                explanation: String::new(),
                overall_confidence: 0.9,
            },
            analysis: SiteAnalysis::default(),
            context,
            event_marker: marker.map(str::to_string),
            risk_profile: RiskProfile {
                clisa_score: 0.0,
                clisa_action: String::new(),
                risk_window: RiskWindow::Early,
                risk_meter: 0.0,
                risk_tier: tier,
                risk_label: TriageLabel::Green,
                traction_alerts: traction,
                venous_trauma_risk: 0.0,
                dwell_time_days: 0.0,
                trend_delta: 0.0,
                patient_factor_score: 0,
                patient_factors: BTreeMap::new(),
                alerts: Vec::new(),
            },
        }
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(calculate_analytics(&[]), HistoryAnalytics::default());
    }

    #[test]
    fn test_counts_and_rate() {
        let entries = vec![
            entry(Some(1), RiskTier::High, Some("dressing_change"), 2),
            entry(Some(1), RiskTier::Low, None, 1),
            entry(Some(2), RiskTier::Moderate, Some("catheter_change"), 0),
            entry(Some(3), RiskTier::High, None, 3),
        ];
        let analytics = calculate_analytics(&entries);
        assert_eq!(analytics.line_days, 3);
        assert_eq!(analytics.clabsi_cases, 2);
        assert_eq!(analytics.clabsi_rate, 0.667);
        assert_eq!(analytics.dressing_events, 1);
        assert_eq!(analytics.catheter_events, 1);
        assert_eq!(analytics.traction_alerts_total, 6);
    }

    #[test]
    fn test_line_days_fall_back_to_entry_count() {
        let entries = vec![
            entry(None, RiskTier::Low, None, 0),
            entry(None, RiskTier::High, None, 0),
        ];
        let analytics = calculate_analytics(&entries);
        assert_eq!(analytics.line_days, 2);
        assert_eq!(analytics.clabsi_rate, 0.5);
    }

    #[test]
    fn test_context_event_marker_counts_when_entry_marker_absent() {
        let mut e = entry(Some(1), RiskTier::Low, None, 0);
        e.context.event_marker = Some("dressing_change".to_string());
        let analytics = calculate_analytics(&[e]);
        assert_eq!(analytics.dressing_events, 1);
    }
}
