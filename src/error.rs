//! pii-classifier error types

use thiserror::Error;

/// pii-classifier error type
#[derive(Error, Debug)]
pub enum Error {
    /// Rule pattern failed to compile
    #[error("Invalid regex pattern for rule '{rule}': {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    /// A rule with the same name is already registered
    #[error("Rule '{0}' is already registered")]
    DuplicateRule(String),

    /// Lookup of an unknown rule
    #[error("Rule '{0}' not found")]
    NotFound(String),

    /// A rule's validator failed on an occurrence
    #[error("Validator error in rule '{rule}': {message}")]
    Validator { rule: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rule publishing error
    #[error("Publish error: {0}")]
    Publish(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for pii-classifier operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::DuplicateRule("EnhancedCreditCard".into()).to_string(),
            "Rule 'EnhancedCreditCard' is already registered"
        );
        assert_eq!(
            Error::NotFound("Missing".into()).to_string(),
            "Rule 'Missing' not found"
        );
        let err = Error::Validator {
            rule: "custom".into(),
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "Validator error in rule 'custom': boom");
    }

    #[test]
    fn test_invalid_pattern_keeps_source() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = Error::InvalidPattern {
            rule: "broken".into(),
            source,
        };
        assert!(err.to_string().starts_with("Invalid regex pattern for rule 'broken'"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
