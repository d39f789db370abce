use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::aggregate::aggregate_categories;
use super::category::Category;
use super::config::ScoringConfig;
use super::parameter::ParameterSet;
use super::severity::{assign_severity, Severity, SeverityInputs};
use super::thresholds::VerdictThresholds;

/// Coarse classification of a scanned site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Safe,
    SafeWithCaution,
    AtRisk,
    Unsafe,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Safe => "SAFE",
            Verdict::SafeWithCaution => "SAFE_WITH_CAUTION",
            Verdict::AtRisk => "AT_RISK",
            Verdict::Unsafe => "UNSAFE",
        }
    }
}

/// Single row of the category breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryRisk {
    pub category: Category,
    pub risk: f64,
}

/// Outcome of the global scorer for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub trust_score: u8,
    pub global_risk: f64,
    pub verdict: Verdict,
    pub category_risks: BTreeMap<Category, f64>,
    pub severity: Severity,
    pub critical_flags: Vec<String>,
}

impl ScoreSummary {
    /// Category breakdown in the canonical category order.
    pub fn category_breakdown(&self) -> Vec<CategoryRisk> {
        Category::ordered()
            .into_iter()
            .filter_map(|category| {
                self.category_risks
                    .get(&category)
                    .map(|risk| CategoryRisk {
                        category,
                        risk: *risk,
                    })
            })
            .collect()
    }

    pub fn max_category_risk(&self) -> f64 {
        self.category_risks.values().copied().fold(0.0, f64::max)
    }
}

/// `Σ weight[c] * risk[c]`; categories without a risk entry contribute zero.
pub fn global_risk(category_risks: &BTreeMap<Category, f64>, config: &ScoringConfig) -> f64 {
    let risk: f64 = Category::ordered()
        .into_iter()
        .map(|category| {
            let category_risk = category_risks.get(&category).copied().unwrap_or(0.0);
            config.category_weight(category) * category_risk
        })
        .sum();
    risk.clamp(0.0, 1.0)
}

/// `round(100 * (1 - global_risk))`, ties to even, bounded to `[0, 100]`.
pub fn trust_score_for(global_risk: f64) -> u8 {
    let score = (100.0 * (1.0 - global_risk)).round_ties_even();
    score.clamp(0.0, 100.0) as u8
}

pub fn verdict_for(trust_score: u8, thresholds: &VerdictThresholds) -> Verdict {
    if trust_score < thresholds.unsafe_below {
        Verdict::Unsafe
    } else if trust_score < thresholds.at_risk_below {
        Verdict::AtRisk
    } else if trust_score < thresholds.caution_below {
        Verdict::SafeWithCaution
    } else {
        Verdict::Safe
    }
}

/// Critical-set members with a strictly positive risk, in discovery order.
pub fn critical_flags(parameters: &ParameterSet, config: &ScoringConfig) -> Vec<String> {
    parameters
        .iter()
        .filter(|parameter| config.is_critical(&parameter.name) && parameter.risk_value > 0.0)
        .map(|parameter| parameter.name.clone())
        .collect()
}

pub(crate) fn summarize(
    parameters: &ParameterSet,
    config: &ScoringConfig,
    trend_drop: i32,
) -> ScoreSummary {
    let category_risks = aggregate_categories(parameters, config);
    let global_risk = global_risk(&category_risks, config);
    let trust_score = trust_score_for(global_risk);
    let mut verdict = verdict_for(trust_score, &config.verdict_thresholds);

    let critical_flags = critical_flags(parameters, config);
    if !critical_flags.is_empty() {
        info!(
            flags = ?critical_flags,
            computed = verdict.label(),
            "critical flags present, forcing UNSAFE verdict"
        );
        verdict = Verdict::Unsafe;
    }

    let severity = assign_severity(
        SeverityInputs {
            trust_score,
            category_risks: &category_risks,
            has_critical_flags: !critical_flags.is_empty(),
            trend_drop,
        },
        &config.severity_thresholds,
        config.critical_flags_escalate_severity,
    );

    debug!(
        trust_score,
        global_risk,
        verdict = verdict.label(),
        severity = severity.label(),
        categories = category_risks.len(),
        "summary computed"
    );

    ScoreSummary {
        trust_score,
        global_risk,
        verdict,
        category_risks,
        severity,
        critical_flags,
    }
}
