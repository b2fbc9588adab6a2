use thiserror::Error;

use crate::types::RuleName;

/// The schema definition is internally inconsistent.
///
/// Raised by the consistency checker on the first problem found; a broken
/// schema is an authoring error, never a data error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The document has no key to identify it.
    #[error("schema document key must be a non-empty string")]
    MissingKey,
    /// A field declares no storage kind.
    #[error("'storage' must be set in key '{field}' - field is required.")]
    MissingStorage { field: String },
    /// A rule is configured where it can never apply.
    #[error("'{rule}' must not be set in key '{field}' {reason}.")]
    ForbiddenRule {
        field: String,
        rule: RuleName,
        reason: String,
    },
    /// A rule the storage kind depends on is missing.
    #[error("'{rule}' must be set in key '{field}' {reason}.")]
    RequiredRule {
        field: String,
        rule: RuleName,
        reason: String,
    },
    /// `default_value` does not satisfy the field's own rules.
    #[error("default value for key '{field}' is invalid: {source}")]
    InvalidDefault {
        field: String,
        #[source]
        source: ValidationError,
    },
}

impl ConfigError {
    /// Path-qualified field the error refers to, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::MissingKey => None,
            ConfigError::MissingStorage { field }
            | ConfigError::ForbiddenRule { field, .. }
            | ConfigError::RequiredRule { field, .. }
            | ConfigError::InvalidDefault { field, .. } => Some(field),
        }
    }
}

/// A record value violates a schema rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Dot-joined path from the record root.
    pub path: String,
    pub message: String,
    /// Nothing was supplied for a required field, as opposed to an invalid value.
    pub required_and_missing: bool,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            required_and_missing: false,
        }
    }

    pub fn missing(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            required_and_missing: true,
            ..Self::new(path, message)
        }
    }
}

/// Convenience alias for schema-authoring results.
pub type Result<T> = std::result::Result<T, ConfigError>;
