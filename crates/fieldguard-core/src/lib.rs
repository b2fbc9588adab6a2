//! Core contracts and helpers for Fieldguard.
//!
//! This crate defines the declarative field schema format, the value
//! classification helpers (emptiness, kinds, path lookup), and the error
//! types shared by the checker, the validator, and the sync client.

pub mod error;
pub mod path;
pub mod rules;
pub mod schema;
pub mod types;
pub mod value;

pub use error::{ConfigError, Result, ValidationError};
pub use path::{is_present, normalize_path, resolve_path, resolve_path_or};
pub use rules::{
    Condition, ConditionalRule, Demand, EmailOptions, EmailRule, KeyEquals, PhoneOptions,
    PhoneRule, Rules,
};
pub use schema::{
    EnumEntry, EnumSource, FieldConfig, HttpMethod, Presentation, RemoteSource, Schema,
    SchemaDocument, TablePresentation,
};
pub use types::{RuleName, StorageKind};
pub use value::{ValueKind, display_value, is_blank, is_empty, measured_length, scalars_equal};

/// Version of the schema document format.
pub const SCHEMA_FORMAT_VERSION: &str = "0.1";
