//! Classification rule definitions
//!
//! A rule is plain data: a lexical pattern plus optional post-match checks
//! (literal exclusions, a validator, contextual keywords). Rules are loaded
//! from config or built in code and compiled by the [`RuleRegistry`].
//!
//! [`RuleRegistry`]: crate::privacy::RuleRegistry

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Coarse trust tier attached to every match of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    #[serde(alias = "Low")]
    Low,
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "High")]
    High,
}

impl ConfidenceLevel {
    /// Percent score used by managed governance services for this tier.
    pub fn score(self) -> u8 {
        match self {
            Self::Low => 65,
            Self::Medium => 75,
            Self::High => 85,
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

type ValidatorFn = dyn Fn(&str) -> std::result::Result<bool, String> + Send + Sync;

/// A programmatic validator. Returns `Ok(false)` to reject an occurrence and
/// `Err` when the validator itself cannot evaluate it.
#[derive(Clone)]
pub struct CustomValidator {
    name: String,
    func: Arc<ValidatorFn>,
}

impl CustomValidator {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<bool, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValidator")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Post-match validator applied to each occurrence of a rule's pattern
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    /// Luhn mod-10 checksum over the digits of the occurrence
    Luhn,
    /// Programmatic validator (not loadable from config)
    #[serde(skip)]
    Custom(CustomValidator),
}

impl Validator {
    /// Run the validator against a single occurrence.
    pub fn check(&self, text: &str) -> std::result::Result<bool, String> {
        match self {
            Self::Luhn => Ok(super::checksum::luhn_valid(text)),
            Self::Custom(custom) => (custom.func)(text),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Luhn => "luhn",
            Self::Custom(custom) => custom.name(),
        }
    }
}

/// A named classification rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRule {
    /// Unique rule name
    pub name: String,
    /// Regular expression the occurrence must match
    pub pattern: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Confidence assigned to every surviving match
    pub confidence: ConfidenceLevel,
    /// Optional validator run on each occurrence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<Validator>,
    /// Literal occurrences that are never reported (e.g. test card numbers)
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub exclusions: BTreeSet<String>,
    /// At least one must appear in the document for a match to count
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub required_keywords: BTreeSet<String>,
    /// Any of these in the document suppresses all matches of the rule
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub exclusion_keywords: BTreeSet<String>,
}

impl ClassificationRule {
    pub fn new(
        name: impl Into<String>,
        pattern: impl Into<String>,
        confidence: ConfidenceLevel,
    ) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            description: String::new(),
            confidence,
            validator: None,
            exclusions: BTreeSet::new(),
            required_keywords: BTreeSet::new(),
            exclusion_keywords: BTreeSet::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn exclusions<I, S>(mut self, literals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions.extend(literals.into_iter().map(Into::into));
        self
    }

    pub fn required_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_keywords
            .extend(keywords.into_iter().map(Into::into));
        self
    }

    pub fn exclusion_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusion_keywords
            .extend(keywords.into_iter().map(Into::into));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_ordering_and_score() {
        assert!(ConfidenceLevel::High > ConfidenceLevel::Medium);
        assert!(ConfidenceLevel::Medium > ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::High.score(), 85);
        assert_eq!(ConfidenceLevel::Medium.score(), 75);
        assert_eq!(ConfidenceLevel::Low.to_string(), "Low");
    }

    #[test]
    fn test_builder() {
        let rule = ClassificationRule::new("r", r"\d+", ConfidenceLevel::Low)
            .description("digits")
            .validator(Validator::Luhn)
            .exclusions(["0000"])
            .required_keywords(["account"])
            .exclusion_keywords(["test", "sample"]);
        assert_eq!(rule.description, "digits");
        assert!(matches!(rule.validator, Some(Validator::Luhn)));
        assert!(rule.exclusions.contains("0000"));
        assert_eq!(rule.exclusion_keywords.len(), 2);
    }

    #[test]
    fn test_custom_validator() {
        let v = Validator::Custom(CustomValidator::new("even_len", |s: &str| {
            Ok(s.len() % 2 == 0)
        }));
        assert_eq!(v.name(), "even_len");
        assert_eq!(v.check("ab"), Ok(true));
        assert_eq!(v.check("abc"), Ok(false));
        assert!(format!("{:?}", v).contains("even_len"));
    }

    #[test]
    fn test_deserialize_rule_from_toml() {
        let rule: ClassificationRule = toml::from_str(
            r#"
            name = "EmployeeId"
            pattern = '\bEMP-\d{6}\b'
            confidence = "High"
            validator = "luhn"
            required_keywords = ["employee"]
            "#,
        )
        .unwrap();
        assert_eq!(rule.name, "EmployeeId");
        assert_eq!(rule.confidence, ConfidenceLevel::High);
        assert!(matches!(rule.validator, Some(Validator::Luhn)));
        assert!(rule.exclusions.is_empty());
        assert!(rule.required_keywords.contains("employee"));
    }

    #[test]
    fn test_serialize_skips_empty_sets() {
        let rule = ClassificationRule::new("r", "x", ConfidenceLevel::Medium);
        let json = serde_json::to_string(&rule).unwrap();
        assert!(!json.contains("exclusions"));
        assert!(!json.contains("validator"));
        assert!(json.contains("\"confidence\":\"medium\""));
    }
}
