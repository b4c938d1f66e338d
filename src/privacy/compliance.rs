//! Built-in rule sets for compliance frameworks.
//!
//! - PCI-DSS (Payment Card Industry Data Security Standard)
//! - HIPAA (Health Insurance Portability and Accountability Act)
//!
//! User-defined rules are loaded from config and appended after these.

use crate::privacy::rule::{ClassificationRule, ConfidenceLevel, Validator};
use serde::{Deserialize, Serialize};

/// Compliance framework identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplianceFramework {
    /// PCI-DSS — Payment card data
    PciDss,
    /// HIPAA — Protected Health Information
    Hipaa,
}

impl ComplianceFramework {
    pub const ALL: [ComplianceFramework; 2] = [Self::PciDss, Self::Hipaa];
}

impl std::fmt::Display for ComplianceFramework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PciDss => write!(f, "PCI-DSS"),
            Self::Hipaa => write!(f, "HIPAA"),
        }
    }
}

/// Rules for a single framework
pub fn rules_for(framework: ComplianceFramework) -> Vec<ClassificationRule> {
    match framework {
        ComplianceFramework::PciDss => pci_dss_rules(),
        ComplianceFramework::Hipaa => hipaa_rules(),
    }
}

/// Rules for several frameworks, in the order given
pub fn rules_for_all(frameworks: &[ComplianceFramework]) -> Vec<ClassificationRule> {
    frameworks.iter().flat_map(|f| rules_for(*f)).collect()
}

/// Every built-in rule: card numbers first, then medical record numbers
pub fn default_rules() -> Vec<ClassificationRule> {
    rules_for_all(&ComplianceFramework::ALL)
}

// ---- PCI-DSS Rules ----

/// PCI-DSS payment card detection rules
pub fn pci_dss_rules() -> Vec<ClassificationRule> {
    vec![
        // Visa / Mastercard PAN, plain or in groups of four; 13-digit legacy Visa
        ClassificationRule::new(
            "EnhancedCreditCard",
            r"\b(?:4\d{3}|5[1-5]\d{2})(?:[- ]?\d{4}){3}\b|\b4\d{12}\b",
            ConfidenceLevel::High,
        )
        .description("Credit Card Numbers")
        .validator(Validator::Luhn)
        .exclusions(["4111-1111-1111-1111", "4111111111111111"]),
    ]
}

// ---- HIPAA Rules ----

/// HIPAA Protected Health Information detection rules
pub fn hipaa_rules() -> Vec<ClassificationRule> {
    vec![ClassificationRule::new(
        "MedicalRecordNumber",
        r"\bMRN-\d{8}-[A-Z]{3}\b",
        ConfidenceLevel::Medium,
    )
    .description("Medical Record Numbers")
    .required_keywords(["patient", "diagnosis"])
    .exclusion_keywords(["test", "sample"])]
}
