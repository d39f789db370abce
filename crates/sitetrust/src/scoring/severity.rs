use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::thresholds::SeverityThresholds;

/// Coarse urgency level, independent from the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

/// Inputs of the severity ladder for one run.
#[derive(Debug, Clone, Copy)]
pub struct SeverityInputs<'a> {
    pub trust_score: u8,
    pub category_risks: &'a BTreeMap<Category, f64>,
    pub has_critical_flags: bool,
    pub trend_drop: i32,
}

/// Classify a run. `has_critical_flags` only escalates when `escalate_critical_flags` is set.
pub fn assign_severity(
    inputs: SeverityInputs<'_>,
    thresholds: &SeverityThresholds,
    escalate_critical_flags: bool,
) -> Severity {
    let max_category_risk = inputs
        .category_risks
        .values()
        .copied()
        .fold(0.0_f64, f64::max);

    if (escalate_critical_flags && inputs.has_critical_flags)
        || inputs.trust_score < thresholds.critical_trust_below
        || max_category_risk > thresholds.critical_category_risk_above
        || inputs.trend_drop > thresholds.critical_trend_drop_above
    {
        Severity::Critical
    } else if inputs.trust_score < thresholds.high_trust_below
        || max_category_risk > thresholds.high_category_risk_above
    {
        Severity::High
    } else if inputs.trust_score < thresholds.medium_trust_below
        || max_category_risk > thresholds.medium_category_risk_above
    {
        Severity::Medium
    } else {
        Severity::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(trust_score: u8, risks: &[(Category, f64)], trend_drop: i32) -> Severity {
        let category_risks: BTreeMap<_, _> = risks.iter().copied().collect();
        assign_severity(
            SeverityInputs {
                trust_score,
                category_risks: &category_risks,
                has_critical_flags: false,
                trend_drop,
            },
            &SeverityThresholds::default(),
            false,
        )
    }

    #[test]
    fn empty_category_map_defaults_to_zero_risk() {
        assert_eq!(classify(100, &[], 0), Severity::Low);
        assert_eq!(classify(84, &[], 0), Severity::Medium);
        assert_eq!(classify(69, &[], 0), Severity::High);
        assert_eq!(classify(49, &[], 0), Severity::Critical);
    }

    #[test]
    fn category_risk_bounds_are_exclusive() {
        assert_eq!(classify(95, &[(Category::Security, 0.3)], 0), Severity::Low);
        assert_eq!(classify(95, &[(Category::Security, 0.31)], 0), Severity::Medium);
        assert_eq!(classify(95, &[(Category::SeoContent, 0.5)], 0), Severity::Medium);
        assert_eq!(classify(95, &[(Category::SeoContent, 0.51)], 0), Severity::High);
        assert_eq!(classify(95, &[(Category::ComplianceTrust, 0.7)], 0), Severity::High);
        assert_eq!(
            classify(95, &[(Category::ComplianceTrust, 0.71)], 0),
            Severity::Critical
        );
    }

    #[test]
    fn trend_drop_above_fifteen_is_critical() {
        assert_eq!(classify(95, &[], 15), Severity::Low);
        assert_eq!(classify(95, &[], 16), Severity::Critical);
    }

    #[test]
    fn critical_flags_only_escalate_when_enabled() {
        let category_risks = BTreeMap::new();
        let inputs = SeverityInputs {
            trust_score: 98,
            category_risks: &category_risks,
            has_critical_flags: true,
            trend_drop: 0,
        };
        let thresholds = SeverityThresholds::default();

        assert_eq!(assign_severity(inputs, &thresholds, false), Severity::Low);
        assert_eq!(assign_severity(inputs, &thresholds, true), Severity::Critical);
    }
}
