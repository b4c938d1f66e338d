//! Text classifier applying registered rules to input text

use crate::error::{Error, Result};
use crate::privacy::registry::{CompiledRule, RuleRegistry};
use crate::privacy::rule::{ConfidenceLevel, Validator};
use serde::Serialize;
use std::sync::Arc;

/// A single match found during classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// Rule name that matched
    pub rule_name: String,
    /// The matched text
    pub matched_text: String,
    /// Confidence of the rule that produced the match
    pub confidence: ConfidenceLevel,
    /// Start byte offset in the text
    pub start: usize,
    /// End byte offset in the text
    pub end: usize,
}

/// Classification result for a piece of text
#[derive(Debug)]
pub struct ClassificationResult {
    /// Highest confidence among the matches, `None` when nothing matched
    pub level: Option<ConfidenceLevel>,
    /// Matches grouped by rule registration order, then by position
    pub matches: Vec<Match>,
    /// Validator failures; each aborted one rule for this text only
    pub errors: Vec<Error>,
}

impl ClassificationResult {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Matches produced by one rule
    pub fn matches_for<'a>(&'a self, rule_name: &'a str) -> impl Iterator<Item = &'a Match> {
        self.matches.iter().filter(move |m| m.rule_name == rule_name)
    }
}

/// Applies every registered rule to input text.
///
/// Holds the registry behind an `Arc`; cloning a classifier is cheap and
/// clones can classify concurrently.
#[derive(Debug, Clone)]
pub struct TextClassifier {
    registry: Arc<RuleRegistry>,
}

impl TextClassifier {
    /// Create a new classifier over the given registry
    pub fn new(registry: RuleRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn from_shared(registry: Arc<RuleRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Classify a piece of text
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let document = text.to_lowercase();
        let mut matches = Vec::new();
        let mut errors = Vec::new();

        for compiled in self.registry.compiled() {
            match evaluate_rule(compiled, text, &document) {
                Ok(found) => matches.extend(found),
                Err(e) => {
                    tracing::warn!(rule = %compiled.rule.name, "{}", e);
                    errors.push(e);
                }
            }
        }

        let level = matches.iter().map(|m| m.confidence).max();

        ClassificationResult {
            level,
            matches,
            errors,
        }
    }

    /// Check if text contains any sensitive data
    pub fn contains_sensitive(&self, text: &str) -> bool {
        !self.classify(text).matches.is_empty()
    }

    /// Redact every reported match in text.
    ///
    /// Where matches from different rules overlap, the earliest-starting
    /// (then longest) one wins.
    pub fn redact(&self, text: &str) -> String {
        let classification = self.classify(text);

        let mut spans: Vec<(usize, usize, String)> = classification
            .matches
            .iter()
            .map(|m| (m.start, m.end, self.redaction_for(m)))
            .collect();
        spans.sort_by_key(|&(start, end, _)| (start, std::cmp::Reverse(end)));

        let mut result = String::with_capacity(text.len());
        let mut cursor = 0;
        for (start, end, replacement) in spans {
            if start < cursor {
                continue;
            }
            result.push_str(&text[cursor..start]);
            result.push_str(&replacement);
            cursor = end;
        }
        result.push_str(&text[cursor..]);
        result
    }

    fn redaction_for(&self, m: &Match) -> String {
        let checksummed = self
            .registry
            .get(&m.rule_name)
            .map(|rule| matches!(rule.validator, Some(Validator::Luhn)))
            .unwrap_or(false);

        if checksummed {
            mask_digits(&m.matched_text, 4)
        } else {
            format!("[REDACTED:{}]", m.rule_name)
        }
    }
}

/// Evaluate one rule against the text. An `Err` aborts this rule only.
fn evaluate_rule(compiled: &CompiledRule, text: &str, document: &str) -> Result<Vec<Match>> {
    let rule = &compiled.rule;
    let mut context: Option<bool> = None;
    let mut found = Vec::new();

    for occurrence in compiled.pattern.find_iter(text) {
        let matched = occurrence.as_str();

        if rule.exclusions.contains(matched) {
            tracing::trace!(rule = %rule.name, "Occurrence excluded by literal");
            continue;
        }

        if let Some(validator) = &rule.validator {
            let valid = run_validator(validator, matched).map_err(|message| Error::Validator {
                rule: rule.name.clone(),
                message,
            })?;
            if !valid {
                tracing::trace!(
                    rule = %rule.name,
                    validator = validator.name(),
                    "Occurrence rejected by validator"
                );
                continue;
            }
        }

        let context_ok = *context.get_or_insert_with(|| context_allows(compiled, document));
        if !context_ok {
            tracing::trace!(rule = %rule.name, "Occurrence rejected by keyword context");
            continue;
        }

        found.push(Match {
            rule_name: rule.name.clone(),
            matched_text: matched.to_string(),
            confidence: rule.confidence,
            start: occurrence.start(),
            end: occurrence.end(),
        });
    }

    Ok(found)
}

/// Run a validator, turning a panic into an error message.
fn run_validator(validator: &Validator, text: &str) -> std::result::Result<bool, String> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| validator.check(text))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic payload".to_string());
            Err(format!("validator '{}' panicked: {}", validator.name(), detail))
        }
    }
}

/// Whole-document keyword gate. `document` must already be lowercased.
fn context_allows(compiled: &CompiledRule, document: &str) -> bool {
    if !compiled.required_keywords.is_empty()
        && !compiled
            .required_keywords
            .iter()
            .any(|k| document.contains(k.as_str()))
    {
        return false;
    }

    !compiled
        .exclusion_keywords
        .iter()
        .any(|k| document.contains(k.as_str()))
}

/// Mask all digits except the last `keep`, preserving separators.
fn mask_digits(text: &str, keep: usize) -> String {
    let total = text.chars().filter(|c| c.is_ascii_digit()).count();
    let mut seen = 0;
    text.chars()
        .map(|c| {
            if c.is_ascii_digit() {
                seen += 1;
                if seen + keep <= total {
                    return '*';
                }
            }
            c
        })
        .collect()
}
