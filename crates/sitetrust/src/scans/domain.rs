use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{
    CategoryRisk, Decision, Finding, RankedRisk, ScoreSummary, Severity, Verdict,
};

/// Identifier assigned to a recorded scan run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunId(pub String);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registrable host name a scan belongs to, e.g. `example.com`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainName(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("domain must not be empty")]
    Empty,
    #[error("'{0}' is not a valid domain")]
    Invalid(String),
}

impl DomainName {
    /// Accepts bare hosts or URLs; drops scheme, credentials, port, path, and a leading `www.`.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Empty);
        }

        let lowered = trimmed.to_ascii_lowercase();
        let without_scheme = lowered
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&lowered);
        let authority = without_scheme
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default();
        let host = authority.rsplit('@').next().unwrap_or_default();
        let host = host.split(':').next().unwrap_or_default();
        let host = host.trim_end_matches('.');
        let host = host.strip_prefix("www.").unwrap_or(host);

        if host.is_empty() {
            return Err(DomainError::Empty);
        }
        let valid = host.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        });
        if !valid {
            return Err(DomainError::Invalid(trimmed.to_string()));
        }

        Ok(Self(host.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Timeline entry describing a change between two consecutive runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanEvent {
    pub run_id: RunId,
    pub change: String,
    pub severity: Severity,
    pub recorded_at: DateTime<Utc>,
}

/// Everything persisted for one scan run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub run_id: RunId,
    pub domain: DomainName,
    pub created_at: DateTime<Utc>,
    pub trend_drop: i32,
    pub summary: ScoreSummary,
    pub findings: Vec<Finding>,
    pub decisions: Vec<Decision>,
    pub top_risks: Vec<RankedRisk>,
    pub events: Vec<ScanEvent>,
}

impl ScanRecord {
    pub fn overview(&self) -> ScanOverview {
        ScanOverview {
            domain: self.domain.clone(),
            run_id: self.run_id.clone(),
            trust_score: self.summary.trust_score,
            verdict: self.summary.verdict,
            severity: self.summary.severity,
            last_scan: self.created_at,
            categories: self.summary.category_breakdown(),
            critical_flags: self.summary.critical_flags.clone(),
            open_decisions: self.decisions.len(),
        }
    }
}

/// Dashboard view of the latest run for a domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanOverview {
    pub domain: DomainName,
    pub run_id: RunId,
    pub trust_score: u8,
    pub verdict: Verdict,
    pub severity: Severity,
    pub last_scan: DateTime<Utc>,
    pub categories: Vec<CategoryRisk>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub critical_flags: Vec<String>,
    pub open_decisions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_urls() {
        for input in [
            "example.com",
            " Example.COM ",
            "https://www.example.com/pricing?ref=1",
            "http://user@example.com:8443",
            "www.example.com.",
        ] {
            assert_eq!(
                DomainName::parse(input).expect("valid domain").as_str(),
                "example.com",
                "input {input:?}"
            );
        }
    }

    #[test]
    fn parse_keeps_subdomains() {
        let domain = DomainName::parse("https://shop.example.co.uk/").expect("valid domain");
        assert_eq!(domain.as_str(), "shop.example.co.uk");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(DomainName::parse("   "), Err(DomainError::Empty));
        assert_eq!(DomainName::parse("https:///path"), Err(DomainError::Empty));
        assert!(matches!(
            DomainName::parse("exa mple.com"),
            Err(DomainError::Invalid(_))
        ));
        assert!(matches!(
            DomainName::parse("bad..example"),
            Err(DomainError::Invalid(_))
        ));
    }
}
