use serde::{Deserialize, Serialize};

/// Trust-score bounds separating verdicts. Each bound is exclusive: a score below it matches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerdictThresholds {
    pub unsafe_below: u8,
    pub at_risk_below: u8,
    pub caution_below: u8,
}

impl Default for VerdictThresholds {
    fn default() -> Self {
        Self {
            unsafe_below: 50,
            at_risk_below: 70,
            caution_below: 85,
        }
    }
}

impl VerdictThresholds {
    pub fn is_ascending(&self) -> bool {
        self.unsafe_below <= self.at_risk_below && self.at_risk_below <= self.caution_below
    }
}

/// Cut-offs for the severity ladder; trust bounds are exclusive upper bounds, risk bounds are
/// exclusive lower bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityThresholds {
    pub critical_trust_below: u8,
    pub critical_category_risk_above: f64,
    pub critical_trend_drop_above: i32,
    pub high_trust_below: u8,
    pub high_category_risk_above: f64,
    pub medium_trust_below: u8,
    pub medium_category_risk_above: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            critical_trust_below: 50,
            critical_category_risk_above: 0.7,
            critical_trend_drop_above: 15,
            high_trust_below: 70,
            high_category_risk_above: 0.5,
            medium_trust_below: 85,
            medium_category_risk_above: 0.3,
        }
    }
}

impl SeverityThresholds {
    pub fn is_ascending(&self) -> bool {
        self.critical_trust_below <= self.high_trust_below
            && self.high_trust_below <= self.medium_trust_below
            && self.medium_category_risk_above <= self.high_category_risk_above
            && self.high_category_risk_above <= self.critical_category_risk_above
    }
}
