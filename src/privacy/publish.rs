//! Publishing rules to an external data-governance service.
//!
//! Classification never depends on this module. Callers that want rules
//! mirrored remotely inject a [`RulePublisher`]; credentials and transport
//! belong to the implementation, not to the core.

use crate::error::{Error, Result};
use crate::privacy::registry::RuleRegistry;
use crate::privacy::rule::{ClassificationRule, Validator};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

/// Pluggable sink for classification rules.
#[async_trait]
pub trait RulePublisher: Send + Sync {
    /// Publish a single rule.
    async fn publish(&self, rule: &ClassificationRule) -> Result<()>;

    /// Human-readable name for this publisher (used in logs).
    fn name(&self) -> &str;
}

/// Request payload for a custom classifier, in the shape managed
/// governance services accept.
pub fn rule_payload(rule: &ClassificationRule) -> Result<Value> {
    let mut validation = serde_json::Map::new();
    match &rule.validator {
        Some(Validator::Luhn) => {
            validation.insert("luhnCheck".into(), Value::Bool(true));
        }
        Some(Validator::Custom(custom)) => {
            return Err(Error::Publish(format!(
                "Rule '{}' uses custom validator '{}' which cannot be published",
                rule.name,
                custom.name()
            )));
        }
        None => {}
    }
    if !rule.exclusions.is_empty() {
        validation.insert("exclusions".into(), json!(rule.exclusions));
    }

    let mut pattern = json!({
        "pattern": rule.pattern,
        "description": rule.description,
        "confidenceLevel": rule.confidence.to_string(),
    });
    if !validation.is_empty() {
        pattern["validation"] = Value::Object(validation);
    }
    if !rule.required_keywords.is_empty() || !rule.exclusion_keywords.is_empty() {
        pattern["context"] = json!({
            "requiredKeywords": rule.required_keywords,
            "exclusionKeywords": rule.exclusion_keywords,
        });
    }

    Ok(json!({
        "name": rule.name,
        "patterns": [pattern],
    }))
}

/// Publisher that only logs the payload it would send.
pub struct DryRunPublisher {
    account_name: String,
}

impl DryRunPublisher {
    pub fn new(account_name: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
        }
    }
}

#[async_trait]
impl RulePublisher for DryRunPublisher {
    async fn publish(&self, rule: &ClassificationRule) -> Result<()> {
        let payload = serde_json::to_string(&rule_payload(rule)?)?;
        tracing::info!(
            account = %self.account_name,
            rule = %rule.name,
            payload = %payload,
            "Dry run: would publish classification rule"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}

/// Publisher that records the payloads it receives.
#[derive(Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<Value>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payloads published so far, in order
    pub async fn published(&self) -> Vec<Value> {
        self.published.lock().await.clone()
    }
}

#[async_trait]
impl RulePublisher for RecordingPublisher {
    async fn publish(&self, rule: &ClassificationRule) -> Result<()> {
        let payload = rule_payload(rule)?;
        self.published.lock().await.push(payload);
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Publish every registered rule in registration order.
///
/// Stops at the first failure and returns the number of rules published.
pub async fn publish_all(registry: &RuleRegistry, publisher: &dyn RulePublisher) -> Result<usize> {
    let mut count = 0;
    for rule in registry.all() {
        publisher.publish(rule).await.map_err(|e| {
            tracing::error!(publisher = publisher.name(), rule = %rule.name, "{}", e);
            e
        })?;
        count += 1;
    }
    tracing::info!(publisher = publisher.name(), count, "Published classification rules");
    Ok(count)
}
