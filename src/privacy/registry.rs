//! Rule registry holding compiled classification rules

use crate::error::{Error, Result};
use crate::privacy::rule::ClassificationRule;
use regex::Regex;
use std::collections::HashMap;

/// A rule together with its compiled pattern and normalized keywords.
#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    pub(crate) rule: ClassificationRule,
    pub(crate) pattern: Regex,
    pub(crate) required_keywords: Vec<String>,
    pub(crate) exclusion_keywords: Vec<String>,
}

impl CompiledRule {
    fn compile(rule: ClassificationRule) -> Result<Self> {
        let pattern = Regex::new(&rule.pattern).map_err(|source| Error::InvalidPattern {
            rule: rule.name.clone(),
            source,
        })?;

        let required_keywords = normalize_keywords(rule.required_keywords.iter());
        let exclusion_keywords = normalize_keywords(rule.exclusion_keywords.iter());

        Ok(Self {
            rule,
            pattern,
            required_keywords,
            exclusion_keywords,
        })
    }
}

fn normalize_keywords<'a>(keywords: impl Iterator<Item = &'a String>) -> Vec<String> {
    keywords
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Named classification rules in registration order.
///
/// Populated once at startup and read-only afterwards, so a registry can be
/// shared across threads without locking.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<CompiledRule>,
    index: HashMap<String, usize>,
}

impl RuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of rules.
    ///
    /// Fails on the first invalid or duplicate rule; nothing is returned
    /// partially populated.
    pub fn from_rules(rules: impl IntoIterator<Item = ClassificationRule>) -> Result<Self> {
        let mut registry = Self::new();
        for rule in rules {
            registry.register(rule)?;
        }
        Ok(registry)
    }

    /// Register a rule. The registry is left unchanged on error.
    pub fn register(&mut self, rule: ClassificationRule) -> Result<()> {
        if self.index.contains_key(&rule.name) {
            return Err(Error::DuplicateRule(rule.name));
        }

        let compiled = CompiledRule::compile(rule)?;
        tracing::debug!(
            rule = %compiled.rule.name,
            confidence = %compiled.rule.confidence,
            "Registered classification rule"
        );

        self.index
            .insert(compiled.rule.name.clone(), self.rules.len());
        self.rules.push(compiled);
        Ok(())
    }

    /// Look up a rule by name
    pub fn get(&self, name: &str) -> Result<&ClassificationRule> {
        self.index
            .get(name)
            .map(|&i| &self.rules[i].rule)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// All rules in registration order
    pub fn all(&self) -> impl Iterator<Item = &ClassificationRule> {
        self.rules.iter().map(|c| &c.rule)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub(crate) fn compiled(&self) -> &[CompiledRule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::privacy::rule::ConfidenceLevel;

    fn rule(name: &str, pattern: &str) -> ClassificationRule {
        ClassificationRule::new(name, pattern, ConfidenceLevel::Low)
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = RuleRegistry::new();
        registry.register(rule("digits", r"\d+")).unwrap();

        let found = registry.get("digits").unwrap();
        assert_eq!(found.pattern, r"\d+");
        assert!(registry.contains("digits"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_rule_rejected() {
        let mut registry = RuleRegistry::new();
        registry.register(rule("digits", r"\d+")).unwrap();

        let err = registry.register(rule("digits", r"\w+")).unwrap_err();
        assert!(matches!(err, Error::DuplicateRule(ref name) if name == "digits"));
        assert_eq!(registry.get("digits").unwrap().pattern, r"\d+");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_invalid_pattern_leaves_registry_unchanged() {
        let mut registry = RuleRegistry::new();
        let err = registry.register(rule("broken", "(unclosed")).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { ref rule, .. } if rule == "broken"));
        assert!(registry.is_empty());
        assert!(!registry.contains("broken"));
    }

    #[test]
    fn test_get_unknown() {
        let registry = RuleRegistry::new();
        assert!(matches!(registry.get("nope"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_all_preserves_registration_order() {
        let registry = RuleRegistry::from_rules(vec![
            rule("zeta", "z"),
            rule("alpha", "a"),
            rule("mid", "m"),
        ])
        .unwrap();
        let names: Vec<&str> = registry.all().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_from_rules_fails_whole() {
        let result = RuleRegistry::from_rules(vec![rule("ok", "a"), rule("bad", "[")]);
        assert!(matches!(result, Err(Error::InvalidPattern { .. })));
    }

    #[test]
    fn test_keywords_normalized() {
        let registry = RuleRegistry::from_rules(vec![rule("r", "x")
            .required_keywords(["Patient", "  "])
            .exclusion_keywords(["TEST"])])
        .unwrap();
        let compiled = &registry.compiled()[0];
        assert_eq!(compiled.required_keywords, vec!["patient".to_string()]);
        assert_eq!(compiled.exclusion_keywords, vec!["test".to_string()]);
    }
}
