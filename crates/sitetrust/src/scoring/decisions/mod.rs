mod rules;

pub use rules::{HeaderPostureRule, LayoutStabilityRule, LoadPerformanceRule, MetricBudget};

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::category::Category;
use super::parameter::ParameterSet;

/// Expected business impact when a decision is left unaddressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

/// One weighted contribution backing a decision score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionParameter {
    pub name: String,
    pub weight: f64,
    pub risk_value: f64,
}

impl DecisionParameter {
    pub fn new(name: impl Into<String>, weight: f64, risk_value: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            risk_value,
        }
    }
}

/// Prioritizable remediation recommendation produced by a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub category: Category,
    pub title: String,
    pub description: String,
    pub decision_score: f64,
    pub confidence: f64,
    pub impact_level: ImpactLevel,
    pub time_to_damage_days: u32,
    pub recommendation: String,
    pub parameters: Vec<DecisionParameter>,
}

/// `Σ(weight * risk) / Σ(weight)`, or `0.0` when the contributions carry no weight.
pub fn decision_score(contributions: &[DecisionParameter]) -> f64 {
    let total_weight: f64 = contributions.iter().map(|c| c.weight).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }
    let weighted: f64 = contributions.iter().map(|c| c.weight * c.risk_value).sum();
    (weighted / total_weight).clamp(0.0, 1.0)
}

/// Fixed attributes a rule stamps onto every decision it emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleProfile {
    pub category: Category,
    pub title: String,
    pub confidence: f64,
    pub impact_level: ImpactLevel,
    pub time_to_damage_days: u32,
    pub recommendation: String,
}

impl RuleProfile {
    pub fn decide(&self, description: String, contributions: Vec<DecisionParameter>) -> Decision {
        Decision {
            category: self.category,
            title: self.title.clone(),
            description,
            decision_score: decision_score(&contributions),
            confidence: self.confidence,
            impact_level: self.impact_level,
            time_to_damage_days: self.time_to_damage_days,
            recommendation: self.recommendation.clone(),
            parameters: contributions,
        }
    }
}

/// Independent rule inspecting the parameters of one run.
pub trait DecisionRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn evaluate(&self, parameters: &ParameterSet) -> Option<Decision>;
}

/// Registry of rules; every rule runs on every pass, in registration order.
pub struct DecisionEngine {
    rules: Vec<Box<dyn DecisionRule>>,
}

impl DecisionEngine {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn standard() -> Self {
        Self::empty()
            .with_rule(HeaderPostureRule::default())
            .with_rule(LayoutStabilityRule::default())
            .with_rule(LoadPerformanceRule::default())
    }

    pub fn with_rule<R: DecisionRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn evaluate(&self, parameters: &ParameterSet) -> Vec<Decision> {
        self.rules
            .iter()
            .filter_map(|rule| {
                let decision = rule.evaluate(parameters);
                if let Some(decision) = &decision {
                    debug!(
                        rule = rule.name(),
                        score = decision.decision_score,
                        contributions = decision.parameters.len(),
                        "decision rule fired"
                    );
                }
                decision
            })
            .collect()
    }
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for DecisionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecisionEngine")
            .field("rules", &self.rule_names())
            .finish()
    }
}

/// Sort decisions for prioritization: highest score first, ties keep evaluation order.
pub fn prioritize(mut decisions: Vec<Decision>) -> Vec<Decision> {
    decisions.sort_by(|a, b| b.decision_score.total_cmp(&a.decision_score));
    decisions
}
