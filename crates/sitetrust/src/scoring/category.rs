use serde::{Deserialize, Serialize};
use std::fmt;

/// Thematic risk bucket every parameter is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Security")]
    Security,
    #[serde(rename = "SEO & Content")]
    SeoContent,
    #[serde(rename = "Stability & Behavior")]
    StabilityBehavior,
    #[serde(rename = "Identity & Domain")]
    IdentityDomain,
    #[serde(rename = "Compliance & Trust")]
    ComplianceTrust,
}

impl Category {
    pub fn ordered() -> [Category; 5] {
        [
            Category::Security,
            Category::SeoContent,
            Category::StabilityBehavior,
            Category::IdentityDomain,
            Category::ComplianceTrust,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Security => "Security",
            Category::SeoContent => "SEO & Content",
            Category::StabilityBehavior => "Stability & Behavior",
            Category::IdentityDomain => "Identity & Domain",
            Category::ComplianceTrust => "Compliance & Trust",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
