use serde::{Deserialize, Serialize};

use super::category::Category;
use super::config::ScoringConfig;
use super::parameter::ParameterSet;
use super::severity::Severity;

pub const DEFAULT_TOP_RISKS: usize = 5;

/// Parameter-level row handed to persistence alongside the run summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub parameter: String,
    pub risk: f64,
    pub category: Category,
    pub severity: Severity,
}

/// Ranked entry of the "top risks" list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRisk {
    pub parameter: String,
    pub risk: f64,
    pub weight: f64,
    pub weighted_risk: f64,
}

pub fn findings(parameters: &ParameterSet, config: &ScoringConfig) -> Vec<Finding> {
    parameters
        .iter()
        .map(|parameter| Finding {
            parameter: parameter.name.clone(),
            risk: parameter.risk_value,
            category: config.category_of(&parameter.name),
            severity: config.severity_of(&parameter.name),
        })
        .collect()
}

/// Rank by `risk * weight` descending; equal scores keep discovery order.
pub fn top_risks(
    parameters: &ParameterSet,
    config: &ScoringConfig,
    limit: usize,
) -> Vec<RankedRisk> {
    let mut ranked: Vec<RankedRisk> = parameters
        .iter()
        .map(|parameter| {
            let weight = config.weight_of(&parameter.name);
            RankedRisk {
                parameter: parameter.name.clone(),
                risk: parameter.risk_value,
                weight,
                weighted_risk: parameter.risk_value * weight,
            }
        })
        .collect();

    // stable sort
    ranked.sort_by(|a, b| b.weighted_risk.total_cmp(&a.weighted_risk));
    ranked.truncate(limit);
    ranked
}
