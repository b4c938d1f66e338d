//! Privacy classification of free text
//!
//! Provides local detection of sensitive data. Includes:
//! - Regex-based rules with literal exclusions
//! - Checksum validation (Luhn) and contextual keyword gating
//! - Built-in compliance rule sets (PCI-DSS, HIPAA)
//! - A validation harness and an abstract rule publishing capability

pub mod checksum;
pub mod classifier;
pub mod compliance;
pub mod harness;
pub mod publish;
pub mod registry;
pub mod rule;

pub use classifier::{ClassificationResult, Match, TextClassifier};
pub use compliance::{default_rules, ComplianceFramework};
pub use harness::{Sample, SampleReport, ValidationHarness, ValidationReport};
pub use publish::{publish_all, DryRunPublisher, RecordingPublisher, RulePublisher};
pub use registry::RuleRegistry;
pub use rule::{ClassificationRule, ConfidenceLevel, CustomValidator, Validator};
