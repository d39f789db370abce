use std::collections::BTreeMap;

use super::category::Category;
use super::config::ScoringConfig;
use super::parameter::ParameterSet;

#[derive(Debug, Default, Clone, Copy)]
struct CategoryAccumulator {
    weighted_risk: f64,
    total_weight: f64,
}

/// Weighted mean risk per category. Only categories that received a parameter are present.
pub fn aggregate_categories(
    parameters: &ParameterSet,
    config: &ScoringConfig,
) -> BTreeMap<Category, f64> {
    let mut accumulators: BTreeMap<Category, CategoryAccumulator> = BTreeMap::new();

    for parameter in parameters {
        let weight = config.weight_of(&parameter.name);
        let entry = accumulators
            .entry(config.category_of(&parameter.name))
            .or_default();
        entry.weighted_risk += parameter.risk_value * weight;
        entry.total_weight += weight;
    }

    accumulators
        .into_iter()
        .map(|(category, acc)| {
            let risk = if acc.total_weight > 0.0 {
                (acc.weighted_risk / acc.total_weight).clamp(0.0, 1.0)
            } else {
                0.0
            };
            (category, risk)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_mean_within_category() {
        let parameters =
            ParameterSet::from_risks([("missing_csp_header", 0.7), ("dkim_absent", 0.3)])
                .expect("valid parameters");

        let risks = aggregate_categories(&parameters, &ScoringConfig::default());

        assert_eq!(risks.len(), 1);
        let security = risks[&Category::Security];
        assert!((security - 0.5).abs() < 1e-12);
    }

    #[test]
    fn unknown_parameters_use_default_weight_and_category() {
        let parameters = ParameterSet::from_risks([("ssl_expired", 0.0), ("novel_signal", 1.0)])
            .expect("valid parameters");

        let risks = aggregate_categories(&parameters, &ScoringConfig::default());

        // (0.0 * 1.0 + 1.0 * 0.2) / 1.2
        assert!((risks[&Category::Security] - 0.2 / 1.2).abs() < 1e-12);
    }

    #[test]
    fn zero_total_weight_yields_zero_risk() {
        let mut config = ScoringConfig::default();
        config.weights.insert("gdpr_violation".to_string(), 0.0);
        let parameters =
            ParameterSet::from_risks([("gdpr_violation", 1.0)]).expect("valid parameters");

        let risks = aggregate_categories(&parameters, &config);

        assert_eq!(risks.get(&Category::ComplianceTrust), Some(&0.0));
    }

    #[test]
    fn empty_input_has_no_categories() {
        let risks = aggregate_categories(&ParameterSet::new(), &ScoringConfig::default());
        assert!(risks.is_empty());
    }
}
