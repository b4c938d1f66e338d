//! pii-classifier configuration management

use crate::error::{Error, Result};
use crate::privacy::compliance::{rules_for_all, ComplianceFramework};
use crate::privacy::harness::Sample;
use crate::privacy::registry::RuleRegistry;
use crate::privacy::rule::ClassificationRule;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Built-in rule sets to load, in order
    pub frameworks: Vec<ComplianceFramework>,

    /// Custom rules, registered after the built-in ones
    pub rules: Vec<ClassificationRule>,

    /// Samples for the validation harness
    pub samples: Vec<Sample>,

    /// Harness configuration
    pub harness: HarnessConfig,

    /// Rule publishing configuration
    pub publish: PublishConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            frameworks: ComplianceFramework::ALL.to_vec(),
            rules: Vec::new(),
            samples: default_samples(),
            harness: HarnessConfig::default(),
            publish: PublishConfig::default(),
        }
    }
}

/// Harness configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Classify samples on worker threads
    pub parallel: bool,
}

/// Configuration handed to rule publishers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Governance account the rules are published to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,

    /// Render payloads without sending them
    pub dry_run: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            account_name: None,
            dry_run: true,
        }
    }
}

impl PublishConfig {
    /// Account name, or `"local"` when none is configured
    pub fn account(&self) -> &str {
        self.account_name.as_deref().unwrap_or("local")
    }
}

/// Samples used when none are configured
pub fn default_samples() -> Vec<Sample> {
    vec![
        Sample::new("valid_cc", "4111-1111-1111-1111 (should be excluded)"),
        Sample::new("real_cc", "4012-8888-8888-1881 (valid)"),
        Sample::new("mrn", "MRN-20230515-ABC"),
    ]
}

impl ClassifierConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde cannot express
    pub fn validate(&self) -> Result<()> {
        let mut labels = HashSet::new();
        for sample in &self.samples {
            if sample.label.trim().is_empty() {
                return Err(Error::Config("Sample label must not be empty".to_string()));
            }
            if !labels.insert(sample.label.as_str()) {
                return Err(Error::Config(format!(
                    "Duplicate sample label '{}'",
                    sample.label
                )));
            }
        }
        Ok(())
    }

    /// All rules in registration order: built-in sets, then custom rules
    pub fn all_rules(&self) -> Vec<ClassificationRule> {
        let mut rules = rules_for_all(&self.frameworks);
        rules.extend(self.rules.iter().cloned());
        rules
    }

    /// Compile every configured rule into a registry
    pub fn build_registry(&self) -> Result<RuleRegistry> {
        RuleRegistry::from_rules(self.all_rules())
    }
}
