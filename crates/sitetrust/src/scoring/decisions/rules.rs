use super::{Decision, DecisionParameter, DecisionRule, ImpactLevel, RuleProfile};
use crate::scoring::category::Category;
use crate::scoring::parameter::ParameterSet;

/// Flags security headers reported missing (raw value `0`) or weak (risk at or above
/// `weak_risk`). Headers the collaborator did not report are left alone.
#[derive(Debug, Clone)]
pub struct HeaderPostureRule {
    pub headers: Vec<String>,
    pub weak_risk: f64,
    pub weight: f64,
    pub profile: RuleProfile,
}

impl Default for HeaderPostureRule {
    fn default() -> Self {
        Self {
            headers: [
                "content_security_policy",
                "x_frame_options",
                "x_content_type_options",
                "referrer_policy",
            ]
            .iter()
            .map(|header| header.to_string())
            .collect(),
            weak_risk: 0.7,
            weight: 0.25,
            profile: RuleProfile {
                category: Category::Security,
                title: "Missing or weak security headers".to_string(),
                confidence: 0.85,
                impact_level: ImpactLevel::High,
                time_to_damage_days: 21,
                recommendation:
                    "Add CSP, X-Frame-Options, X-Content-Type-Options, Referrer-Policy".to_string(),
            },
        }
    }
}

impl DecisionRule for HeaderPostureRule {
    fn name(&self) -> &'static str {
        "header_posture"
    }

    fn evaluate(&self, parameters: &ParameterSet) -> Option<Decision> {
        let flagged: Vec<&str> = self
            .headers
            .iter()
            .filter(|header| {
                parameters.get(header.as_str()).is_some_and(|parameter| {
                    parameter.raw_number() == Some(0.0) || parameter.risk_value >= self.weak_risk
                })
            })
            .map(String::as_str)
            .collect();

        if flagged.is_empty() {
            return None;
        }

        let contributions = flagged
            .iter()
            .map(|header| DecisionParameter::new(*header, self.weight, 1.0))
            .collect();

        let reason = format!("Issues with: {}", flagged.join(", "));
        Some(self.profile.decide(reason, contributions))
    }
}

/// Fires when cumulative layout shift exceeds `threshold`; risk saturates at `saturation`.
#[derive(Debug, Clone)]
pub struct LayoutStabilityRule {
    pub metric: String,
    pub threshold: f64,
    pub saturation: f64,
    pub weight: f64,
    pub profile: RuleProfile,
}

impl Default for LayoutStabilityRule {
    fn default() -> Self {
        Self {
            metric: "cls_score".to_string(),
            threshold: 0.1,
            saturation: 0.3,
            weight: 0.6,
            profile: RuleProfile {
                category: Category::SeoContent,
                title: "Cumulative Layout Shift risk".to_string(),
                confidence: 0.75,
                impact_level: ImpactLevel::Medium,
                time_to_damage_days: 14,
                recommendation: "Reserve space for images/ads, preload fonts".to_string(),
            },
        }
    }
}

impl DecisionRule for LayoutStabilityRule {
    fn name(&self) -> &'static str {
        "layout_stability"
    }

    fn evaluate(&self, parameters: &ParameterSet) -> Option<Decision> {
        let value = parameters.get(&self.metric)?.raw_number()?;
        if value <= self.threshold {
            return None;
        }

        let risk = (value / self.saturation).min(1.0);
        let contribution = DecisionParameter::new(self.metric.as_str(), self.weight, risk);
        Some(self.profile.decide(
            format!("CLS {value:.3} above threshold"),
            vec![contribution],
        ))
    }
}

/// Upper bound for a timing metric; overshoot is measured relative to `limit`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricBudget {
    pub metric: String,
    pub limit: f64,
}

impl MetricBudget {
    pub fn new(metric: impl Into<String>, limit: f64) -> Self {
        Self {
            metric: metric.into(),
            limit,
        }
    }

    fn overshoot(&self, value: f64) -> Option<f64> {
        (self.limit > 0.0 && value > self.limit)
            .then(|| ((value - self.limit) / self.limit).min(1.0))
    }
}

/// Page-load slowdown: each metric over its budget contributes `weight`.
#[derive(Debug, Clone)]
pub struct LoadPerformanceRule {
    pub budgets: Vec<MetricBudget>,
    pub weight: f64,
    pub profile: RuleProfile,
}

impl Default for LoadPerformanceRule {
    fn default() -> Self {
        Self {
            budgets: vec![
                MetricBudget::new("lcp", 2.5),
                MetricBudget::new("ttfb", 0.6),
            ],
            weight: 0.5,
            profile: RuleProfile {
                category: Category::StabilityBehavior,
                title: "Page load slowdown".to_string(),
                confidence: 0.9,
                impact_level: ImpactLevel::High,
                time_to_damage_days: 7,
                recommendation:
                    "Optimize images, reduce blocking JS/CSS, enable caching".to_string(),
            },
        }
    }
}

impl DecisionRule for LoadPerformanceRule {
    fn name(&self) -> &'static str {
        "load_performance"
    }

    fn evaluate(&self, parameters: &ParameterSet) -> Option<Decision> {
        let contributions: Vec<DecisionParameter> = self
            .budgets
            .iter()
            .filter_map(|budget| {
                let value = parameters.get(&budget.metric)?.raw_number()?;
                let risk = budget.overshoot(value)?;
                Some(DecisionParameter::new(
                    budget.metric.as_str(),
                    self.weight,
                    risk,
                ))
            })
            .collect();

        if contributions.is_empty() {
            return None;
        }

        let metrics: Vec<String> = contributions
            .iter()
            .map(|c| c.name.to_ascii_uppercase())
            .collect();
        Some(self.profile.decide(
            format!("{} above thresholds", metrics.join("/")),
            contributions,
        ))
    }
}
