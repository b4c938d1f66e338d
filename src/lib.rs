//! pii-classifier - Local PII/PHI classification rules
//!
//! A local pattern classification engine for sensitive data: named regex
//! rules with literal exclusions, checksum validators and contextual
//! keyword constraints, applied to free text without any remote service.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      ValidationHarness                        │
//! │   labelled samples ──► classify each ──► ValidationReport     │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌──────────────────────────────▼───────────────────────────────┐
//! │                       TextClassifier                          │
//! │  per rule, in registration order:                             │
//! │   pattern scan → literal exclusions → validator → keywords    │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌──────────────────────────────▼───────────────────────────────┐
//! │                        RuleRegistry                           │
//! │   built-in compliance rules + custom rules from config        │
//! └──────────────────────────────────────────────────────────────┘
//!
//!        RulePublisher (optional, injected) ◄── publish_all
//! ```
//!
//! ## Modules
//!
//! - [`privacy`]: Rules, registry, classifier, harness and publishing
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod config;
pub mod error;
pub mod privacy;

pub use config::ClassifierConfig;
pub use error::{Error, Result};
