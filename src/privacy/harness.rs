//! Validation harness for reviewing classifier behaviour on sample inputs
//!
//! The harness is diagnostic, not a gate: a sample with no matches is a
//! valid outcome and never an error.

use crate::error::{Error, Result};
use crate::privacy::classifier::{Match, TextClassifier};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A labelled input text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub label: String,
    pub text: String,
}

impl Sample {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

impl<L: Into<String>, T: Into<String>> From<(L, T)> for Sample {
    fn from((label, text): (L, T)) -> Self {
        Self::new(label, text)
    }
}

/// Classification outcome for one sample
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleReport {
    pub label: String,
    pub text: String,
    pub matches: Vec<Match>,
    /// Rendered validator errors raised while classifying this sample
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Report over all samples, in sample order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub samples: Vec<SampleReport>,
}

impl ValidationReport {
    pub fn total_matches(&self) -> usize {
        self.samples.iter().map(|s| s.matches.len()).sum()
    }

    pub fn get(&self, label: &str) -> Option<&SampleReport> {
        self.samples.iter().find(|s| s.label == label)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sample in &self.samples {
            writeln!(f, "[{}] Classification for '{}':", sample.label, sample.text)?;
            if sample.matches.is_empty() {
                writeln!(f, "  (no matches)")?;
            }
            for m in &sample.matches {
                writeln!(
                    f,
                    "- {} ({}, {}%)",
                    m.rule_name,
                    m.confidence,
                    m.confidence.score()
                )?;
            }
            for e in &sample.errors {
                writeln!(f, "! {}", e)?;
            }
        }
        Ok(())
    }
}

/// Runs a classifier over labelled samples
#[derive(Debug, Clone)]
pub struct ValidationHarness {
    classifier: TextClassifier,
}

impl ValidationHarness {
    pub fn new(classifier: TextClassifier) -> Self {
        Self { classifier }
    }

    /// Classify every sample sequentially
    pub fn run<I, S>(&self, samples: I) -> ValidationReport
    where
        I: IntoIterator<Item = S>,
        S: Into<Sample>,
    {
        let samples = samples
            .into_iter()
            .map(|s| evaluate(&self.classifier, s.into()))
            .collect();
        ValidationReport { samples }
    }

    /// Classify samples on blocking worker threads.
    ///
    /// Samples are independent; the report keeps the input order.
    pub async fn run_parallel<I, S>(&self, samples: I) -> Result<ValidationReport>
    where
        I: IntoIterator<Item = S>,
        S: Into<Sample>,
    {
        let tasks = samples.into_iter().map(|s| {
            let classifier = self.classifier.clone();
            let sample = s.into();
            tokio::task::spawn_blocking(move || evaluate(&classifier, sample))
        });

        let samples = futures::future::join_all(tasks)
            .await
            .into_iter()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Internal(format!("Classification task failed: {}", e)))?;

        Ok(ValidationReport { samples })
    }
}

fn evaluate(classifier: &TextClassifier, sample: Sample) -> SampleReport {
    let result = classifier.classify(&sample.text);
    tracing::debug!(
        label = %sample.label,
        matches = result.matches.len(),
        "Classified sample"
    );

    SampleReport {
        label: sample.label,
        text: sample.text,
        matches: result.matches,
        errors: result.errors.iter().map(ToString::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::privacy::compliance::default_rules;
    use crate::privacy::registry::RuleRegistry;
    use crate::privacy::rule::ConfidenceLevel;

    fn harness() -> ValidationHarness {
        let registry = RuleRegistry::from_rules(default_rules()).unwrap();
        ValidationHarness::new(TextClassifier::new(registry))
    }

    fn samples() -> Vec<(&'static str, &'static str)> {
        vec![
            ("valid_cc", "4111-1111-1111-1111 (should be excluded)"),
            ("real_cc", "4012-8888-8888-1881 (valid)"),
            ("mrn", "MRN-20230515-ABC"),
            ("mrn_context", "Patient MRN-20230515-ABC diagnosis pending"),
        ]
    }

    #[test]
    fn test_run_reports_every_sample() {
        let report = harness().run(samples());

        assert_eq!(report.samples.len(), 4);
        assert!(report.get("valid_cc").unwrap().matches.is_empty());
        assert!(report.get("mrn").unwrap().matches.is_empty());

        let real = report.get("real_cc").unwrap();
        assert_eq!(real.matches.len(), 1);
        assert_eq!(real.matches[0].confidence, ConfidenceLevel::High);

        let mrn = report.get("mrn_context").unwrap();
        assert_eq!(mrn.matches[0].rule_name, "MedicalRecordNumber");
        assert_eq!(report.total_matches(), 2);
    }

    #[test]
    fn test_zero_matches_is_not_an_error() {
        let report = harness().run([("plain", "nothing to see here")]);
        assert_eq!(report.total_matches(), 0);
        assert!(report.to_string().contains("(no matches)"));
    }

    #[test]
    fn test_display_lists_rule_and_confidence() {
        let rendered = harness().run(samples()).to_string();
        assert!(rendered.contains("[real_cc] Classification for '4012-8888-8888-1881 (valid)':"));
        assert!(rendered.contains("- EnhancedCreditCard (High, 85%)"));
        assert!(rendered.contains("- MedicalRecordNumber (Medium, 75%)"));
    }

    #[test]
    fn test_report_serializes() {
        let report = harness().run([Sample::new("real_cc", "4012-8888-8888-1881")]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["samples"][0]["matches"][0]["ruleName"], "EnhancedCreditCard");
        assert_eq!(json["samples"][0]["matches"][0]["confidence"], "high");
        assert!(json["samples"][0].get("errors").is_none());
    }

    #[tokio::test]
    async fn test_run_parallel_matches_sequential() {
        let harness = harness();
        let sequential = harness.run(samples());
        let parallel = harness.run_parallel(samples()).await.unwrap();

        let labels: Vec<&str> = parallel.samples.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["valid_cc", "real_cc", "mrn", "mrn_context"]);
        for (a, b) in sequential.samples.iter().zip(&parallel.samples) {
            assert_eq!(a.matches, b.matches);
        }
    }
}
