//! Trust scoring and remediation decisions for one scan.
//!
//! Everything here is a pure transformation of a [`ParameterSet`]: the engine keeps no state
//! between calls, so a single instance can be shared across threads behind an `Arc`.

pub mod aggregate;
pub mod category;
pub mod config;
pub mod decisions;
pub mod normalize;
pub mod parameter;
pub mod ranking;
pub mod severity;
pub mod summary;
pub mod thresholds;

#[cfg(test)]
mod tests;

pub use category::Category;
pub use config::{ScoringConfig, ScoringConfigError};
pub use decisions::{
    decision_score, prioritize, Decision, DecisionEngine, DecisionParameter, DecisionRule,
    ImpactLevel, RuleProfile,
};
pub use normalize::normalize_piecewise;
pub use parameter::{Parameter, ParameterSet, RawValue, ScoringError};
pub use ranking::{Finding, RankedRisk, DEFAULT_TOP_RISKS};
pub use severity::Severity;
pub use summary::{CategoryRisk, ScoreSummary, Verdict};
pub use thresholds::{SeverityThresholds, VerdictThresholds};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Stateless engine applying injected configuration tables and decision rules.
#[derive(Debug)]
pub struct ScoringEngine {
    config: ScoringConfig,
    decisions: DecisionEngine,
    top_risk_limit: usize,
}

impl ScoringEngine {
    /// Tables are used as given. Configs assembled in code should go through [`Self::try_new`].
    pub fn new(config: ScoringConfig) -> Self {
        Self::with_decision_engine(config, DecisionEngine::standard())
    }

    /// Like [`Self::new`], but rejects tables that fail [`ScoringConfig::validate`].
    pub fn try_new(config: ScoringConfig) -> Result<Self, ScoringConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn with_decision_engine(config: ScoringConfig, decisions: DecisionEngine) -> Self {
        Self {
            config,
            decisions,
            top_risk_limit: DEFAULT_TOP_RISKS,
        }
    }

    pub fn with_top_risk_limit(mut self, limit: usize) -> Self {
        self.top_risk_limit = limit;
        self
    }

    pub fn score(&self, parameters: &ParameterSet) -> ScanOutcome {
        self.score_with_trend(parameters, 0)
    }

    /// Score a run; `trend_drop` is the caller's trust-score delta versus the previous run.
    pub fn score_with_trend(&self, parameters: &ParameterSet, trend_drop: i32) -> ScanOutcome {
        debug!(
            parameters = parameters.len(),
            trend_drop, "scoring parameter set"
        );

        let summary = summary::summarize(parameters, &self.config, trend_drop);
        let decisions = self.decisions.evaluate(parameters);
        let findings = ranking::findings(parameters, &self.config);
        let top_risks = ranking::top_risks(parameters, &self.config, self.top_risk_limit);

        ScanOutcome {
            summary,
            decisions,
            findings,
            top_risks,
        }
    }

    /// Validate bare `(name, risk)` pairs and score them.
    pub fn score_risks<I, K>(&self, risks: I, trend_drop: i32) -> Result<ScanOutcome, ScoringError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let parameters = ParameterSet::from_risks(risks)?;
        Ok(self.score_with_trend(&parameters, trend_drop))
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

/// Everything a scoring pass produces, handed to persistence and presentation by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub summary: ScoreSummary,
    pub decisions: Vec<Decision>,
    pub findings: Vec<Finding>,
    pub top_risks: Vec<RankedRisk>,
}
