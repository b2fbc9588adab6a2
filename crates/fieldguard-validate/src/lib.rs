//! Schema consistency checking and record validation for Fieldguard.
//!
//! [`check_schema`] verifies an authored schema is internally legal before
//! any data arrives. [`validate`] and friends check a record against a
//! schema, either failing on the first violation or collecting every one
//! into a [`ValidationOutcome`].

pub mod check;
mod conditional;
pub mod errors;
pub mod formats;
pub mod schema;
pub mod validate;

pub use check::{check_document, check_schema};
pub use errors::{DocumentError, DocumentIssue, DocumentReport, FieldFailures, ValidationOutcome};
pub use fieldguard_core::ValidationError;
pub use schema::{document_json_schema, load_document, validate_document_json};
pub use validate::{
    ROOT_PATH, ValidateOptions, validate, validate_collect, validate_field, validate_with_options,
};
