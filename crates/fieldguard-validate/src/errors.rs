use std::collections::BTreeMap;

use fieldguard_core::ValidationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Violations recorded for one field path.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldFailures {
    pub messages: Vec<String>,
    /// Set when the field was required and nothing was supplied.
    pub required_and_missing: bool,
}

/// Aggregated result of a validation pass, keyed by dot-joined field path.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub did_fail: bool,
    pub fields: BTreeMap<String, FieldFailures>,
}

impl ValidationOutcome {
    /// Returns true when no violation was recorded.
    pub fn is_ok(&self) -> bool {
        !self.did_fail
    }

    /// Record a violation under its path.
    pub fn record(&mut self, error: &ValidationError) {
        self.did_fail = true;
        let entry = self.fields.entry(error.path.clone()).or_default();
        if error.required_and_missing {
            entry.required_and_missing = true;
        }
        entry.messages.push(error.message.clone());
    }

    pub fn field(&self, path: &str) -> Option<&FieldFailures> {
        self.fields.get(path)
    }

    /// Messages recorded for `path`, empty when the field passed.
    pub fn messages(&self, path: &str) -> &[String] {
        self.fields
            .get(path)
            .map(|failures| failures.messages.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_required_and_missing(&self, path: &str) -> bool {
        self.fields
            .get(path)
            .is_some_and(|failures| failures.required_and_missing)
    }

    /// Total number of messages across all paths.
    pub fn len(&self) -> usize {
        self.fields.values().map(|f| f.messages.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Flatten into individual errors, ordered by path.
    pub fn errors(&self) -> impl Iterator<Item = ValidationError> + '_ {
        self.fields.iter().flat_map(|(path, failures)| {
            failures.messages.iter().map(move |message| ValidationError {
                path: path.clone(),
                message: message.clone(),
                required_and_missing: failures.required_and_missing,
            })
        })
    }
}

/// Structural issue found when checking a raw schema document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentIssue {
    pub code: String,
    /// JSON Pointer into the document.
    pub path: String,
    pub message: String,
}

impl DocumentIssue {
    pub fn new(code: impl Into<String>, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Structural issues of a raw schema document.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    pub issues: Vec<DocumentIssue>,
}

impl DocumentReport {
    /// Returns true when there are no issues.
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn push(&mut self, issue: DocumentIssue) {
        self.issues.push(issue);
    }
}

/// Errors raised while loading a schema document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("schema error: {0}")]
    Schema(String),
    #[error("document has {} structural issue(s)", .0.issues.len())]
    Structure(DocumentReport),
}
