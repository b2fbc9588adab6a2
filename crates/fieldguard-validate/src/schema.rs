use fieldguard_core::SchemaDocument;
use jsonschema::JSONSchema;
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde_json::Value;

use crate::errors::{DocumentError, DocumentIssue, DocumentReport};

/// Emit the JSON Schema for a schema document.
pub fn document_json_schema() -> RootSchema {
    schema_for!(SchemaDocument)
}

/// Validate a raw schema document against the document JSON Schema.
pub fn validate_document_json(document: &Value) -> Result<DocumentReport, DocumentError> {
    let schema = serde_json::to_value(document_json_schema())?;
    let compiled =
        JSONSchema::compile(&schema).map_err(|err| DocumentError::Schema(err.to_string()))?;

    let mut report = DocumentReport::default();
    if let Err(errors) = compiled.validate(document) {
        for error in errors {
            let path = normalized_json_pointer(&error.instance_path.to_string());
            report.push(DocumentIssue::new("schema_violation", path, error.to_string()));
        }
    }
    Ok(report)
}

/// Structurally check a raw document, then deserialize it.
///
/// Rule legality is not checked here; see [`crate::check_document`].
pub fn load_document(document: &Value) -> Result<SchemaDocument, DocumentError> {
    let report = validate_document_json(document)?;
    if !report.is_ok() {
        tracing::debug!(event = "document_rejected", issues = report.issues.len());
        return Err(DocumentError::Structure(report));
    }
    Ok(serde_json::from_value(document.clone())?)
}

fn normalized_json_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
