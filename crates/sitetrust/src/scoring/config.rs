use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::severity::Severity;
use super::thresholds::{SeverityThresholds, VerdictThresholds};

pub const DEFAULT_PARAMETER_WEIGHT: f64 = 0.2;
const CATEGORY_WEIGHT_TOLERANCE: f64 = 1e-6;

const PARAMETER_WEIGHTS: &[(&str, f64)] = &[
    ("ssl_expired", 1.0),
    ("malware_detected", 1.0),
    ("phishing_pattern", 1.0),
    ("blacklist_hit", 1.0),
    ("ssl_expiry_days", 0.8),
    ("missing_csp_header", 0.7),
    ("dkim_absent", 0.7),
    ("spf_absent", 0.7),
    ("open_ports", 0.6),
    ("weak_cipher_suites", 0.5),
    ("robots_txt_sensitive", 0.4),
    ("missing_hsts_header", 0.4),
    ("favicon_hash_missing", 0.2),
    ("minor_header_issue", 0.2),
];

const PARAMETER_SEVERITIES: &[(&str, Severity)] = &[
    ("ssl_expired", Severity::Critical),
    ("malware_detected", Severity::Critical),
    ("phishing_pattern", Severity::Critical),
    ("blacklist_hit", Severity::Critical),
    ("ssl_expiry_days", Severity::High),
    ("missing_csp_header", Severity::High),
    ("dkim_absent", Severity::High),
    ("spf_absent", Severity::High),
    ("open_ports", Severity::High),
    ("weak_cipher_suites", Severity::Medium),
    ("robots_txt_sensitive", Severity::Medium),
    ("missing_hsts_header", Severity::Medium),
    ("favicon_hash_missing", Severity::Low),
    ("minor_header_issue", Severity::Low),
];

const CATEGORY_MEMBERS: &[(Category, &[&str])] = &[
    (
        Category::Security,
        &[
            "ssl_expired",
            "missing_csp_header",
            "dkim_absent",
            "spf_absent",
            "open_ports",
            "weak_cipher_suites",
            "robots_txt_sensitive",
            "missing_hsts_header",
            "favicon_hash_missing",
            "minor_header_issue",
        ],
    ),
    (
        Category::SeoContent,
        &[
            "hidden_spam_links",
            "deceptive_redirects",
            "indexed_pages_drop",
            "duplicate_meta_titles",
            "missing_meta_description",
            "poor_mobile_optimization",
            "missing_alt_text",
            "weak_keyword_density",
        ],
    ),
    (
        Category::StabilityBehavior,
        &[
            "site_unreachable",
            "response_time_high",
            "frequent_5xx_errors",
            "response_time_medium",
            "occasional_404_spikes",
            "minor_js_errors",
            "css_validation_issues",
        ],
    ),
    (
        Category::IdentityDomain,
        &[
            "domain_expired",
            "whois_privacy_disabled_sensitive",
            "dns_misconfig",
            "whois_privacy_disabled",
            "registrar_lock_disabled",
            "missing_org_info",
        ],
    ),
    (
        Category::ComplianceTrust,
        &[
            "cookie_banner_missing",
            "gdpr_violation",
            "ccpa_violation",
            "privacy_policy_missing",
            "terms_missing",
            "cookie_banner_nonfunctional",
            "accessibility_statement_missing",
            "weak_contact_page",
        ],
    ),
];

const CATEGORY_WEIGHTS: &[(Category, f64)] = &[
    (Category::Security, 0.30),
    (Category::SeoContent, 0.20),
    (Category::StabilityBehavior, 0.20),
    (Category::IdentityDomain, 0.15),
    (Category::ComplianceTrust, 0.15),
];

const CRITICAL_FLAGS: &[&str] = &[
    "ssl_expired",
    "malware_detected",
    "phishing_pattern",
    "blacklist_hit",
    "domain_expired",
    "gdpr_violation",
    "ccpa_violation",
    "hidden_spam_links",
    "deceptive_redirects",
    "site_unreachable",
    "cookie_banner_missing",
];

/// Lookup tables and thresholds driving a scoring pass.
///
/// Every lookup is total: unknown names fall back to `default_weight`, `default_category`
/// and `Severity::Low`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: BTreeMap<String, f64>,
    pub default_weight: f64,
    pub categories: BTreeMap<String, Category>,
    pub default_category: Category,
    pub category_weights: BTreeMap<Category, f64>,
    pub critical_flags: BTreeSet<String>,
    pub parameter_severities: BTreeMap<String, Severity>,
    pub verdict_thresholds: VerdictThresholds,
    pub severity_thresholds: SeverityThresholds,
    /// Whether a confirmed critical flag also forces `CRITICAL` severity.
    pub critical_flags_escalate_severity: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let weights = PARAMETER_WEIGHTS
            .iter()
            .map(|(name, weight)| (name.to_string(), *weight))
            .collect();

        let categories = CATEGORY_MEMBERS
            .iter()
            .flat_map(|(category, members)| {
                members.iter().map(move |name| (name.to_string(), *category))
            })
            .collect();

        let parameter_severities = PARAMETER_SEVERITIES
            .iter()
            .map(|(name, severity)| (name.to_string(), *severity))
            .collect();

        Self {
            weights,
            default_weight: DEFAULT_PARAMETER_WEIGHT,
            categories,
            default_category: Category::Security,
            category_weights: CATEGORY_WEIGHTS.iter().copied().collect(),
            critical_flags: CRITICAL_FLAGS.iter().map(|name| name.to_string()).collect(),
            parameter_severities,
            verdict_thresholds: VerdictThresholds::default(),
            severity_thresholds: SeverityThresholds::default(),
            critical_flags_escalate_severity: false,
        }
    }
}

impl ScoringConfig {
    /// Load an override from a JSON file; omitted tables keep their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScoringConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ScoringConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: ScoringConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn weight_of(&self, name: &str) -> f64 {
        self.weights
            .get(name)
            .copied()
            .unwrap_or(self.default_weight)
    }

    pub fn category_of(&self, name: &str) -> Category {
        self.categories
            .get(name)
            .copied()
            .unwrap_or(self.default_category)
    }

    /// Category weights missing from the table contribute nothing to the global risk.
    pub fn category_weight(&self, category: Category) -> f64 {
        self.category_weights.get(&category).copied().unwrap_or(0.0)
    }

    pub fn is_critical(&self, name: &str) -> bool {
        self.critical_flags.contains(name)
    }

    pub fn severity_of(&self, name: &str) -> Severity {
        self.parameter_severities
            .get(name)
            .copied()
            .unwrap_or(Severity::Low)
    }

    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        let parameter_weights = self
            .weights
            .iter()
            .map(|(name, weight)| (name.as_str(), *weight))
            .chain(std::iter::once(("<default>", self.default_weight)));
        for (name, weight) in parameter_weights {
            if !(weight.is_finite() && weight > 0.0 && weight <= 1.0) {
                return Err(ScoringConfigError::InvalidWeight {
                    name: name.to_string(),
                    value: weight,
                });
            }
        }

        for (category, weight) in &self.category_weights {
            if !(weight.is_finite() && *weight >= 0.0) {
                return Err(ScoringConfigError::InvalidCategoryWeight {
                    category: *category,
                    value: *weight,
                });
            }
        }

        let total: f64 = self.category_weights.values().sum();
        if (total - 1.0).abs() > CATEGORY_WEIGHT_TOLERANCE {
            return Err(ScoringConfigError::CategoryWeightSum(total));
        }

        if !self.verdict_thresholds.is_ascending() {
            return Err(ScoringConfigError::UnorderedThresholds("verdict"));
        }
        if !self.severity_thresholds.is_ascending() {
            return Err(ScoringConfigError::UnorderedThresholds("severity"));
        }

        Ok(())
    }
}

/// Errors raised while loading or validating a scoring configuration.
#[derive(Debug, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("unable to read scoring config at {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("scoring config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("weight for '{name}' must be within (0, 1] (found {value})")]
    InvalidWeight { name: String, value: f64 },
    #[error("category weight for {category} must be a non-negative number (found {value})")]
    InvalidCategoryWeight { category: Category, value: f64 },
    #[error("category weights must sum to 1.0 (found {0})")]
    CategoryWeightSum(f64),
    #[error("{0} thresholds must be in ascending order")]
    UnorderedThresholds(&'static str),
}
