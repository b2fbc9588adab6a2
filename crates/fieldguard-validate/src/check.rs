use fieldguard_core::{
    ConfigError, FieldConfig, Result, RuleName, Schema, SchemaDocument, StorageKind,
};
use serde_json::{Map, Value};

use crate::validate::{ValidateOptions, validate_field};

/// Check a schema document: the key must be set and the fields consistent.
pub fn check_document(document: &SchemaDocument) -> Result<()> {
    if document.key.trim().is_empty() {
        return Err(ConfigError::MissingKey);
    }
    check_schema(&document.fields)?;
    tracing::debug!(
        event = "schema_checked",
        key = %document.key,
        fields = document.fields.len()
    );
    Ok(())
}

/// Verify every field's rules are legal for its storage kind.
///
/// Stops at the first problem. Nested schemas are checked before the rules
/// of the object field that owns them.
pub fn check_schema(schema: &Schema) -> Result<()> {
    check_fields(schema, None)
}

fn check_fields(schema: &Schema, prefix: Option<&str>) -> Result<()> {
    for (name, field) in schema.iter() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{name}"),
            None => name.clone(),
        };
        check_field(&path, field)?;
    }
    Ok(())
}

fn check_field(path: &str, field: &FieldConfig) -> Result<()> {
    let Some(storage) = field.storage else {
        return Err(ConfigError::MissingStorage {
            field: path.to_string(),
        });
    };

    if !field.optional
        && let Some(rule) = RuleName::ENSURE_EMPTY
            .into_iter()
            .find(|rule| field.rules.is_set(*rule))
    {
        return Err(forbidden(path, rule, "if optional is false"));
    }

    if storage == StorageKind::Object
        && let Some(nested) = field.nested_schema.as_ref()
    {
        check_fields(nested, Some(path))?;
    }

    if let Some(rule) = storage
        .forbidden_rules()
        .iter()
        .copied()
        .find(|rule| is_configured(field, *rule))
    {
        return Err(forbidden(path, rule, &format!("if storage is '{storage}'")));
    }

    match (storage, field.nested_schema.is_some()) {
        (StorageKind::Object, false) => {
            return Err(ConfigError::RequiredRule {
                field: path.to_string(),
                rule: RuleName::NestedSchema,
                reason: "if storage is 'object'".to_string(),
            });
        }
        (kind, true) if kind != StorageKind::Object => {
            return Err(forbidden(path, RuleName::NestedSchema, "if storage isn't object"));
        }
        _ => {}
    }

    if !storage.allows_length(field.is_array)
        && let Some(rule) = RuleName::LENGTH
            .into_iter()
            .find(|rule| field.rules.is_set(*rule))
    {
        return Err(forbidden(
            path,
            rule,
            "if storage isn't string and is_array is false",
        ));
    }

    check_default(path, field)
}

fn is_configured(field: &FieldConfig, rule: RuleName) -> bool {
    match rule {
        RuleName::Enum => field.has_enum(),
        RuleName::NestedSchema => field.nested_schema.is_some(),
        other => field.rules.is_set(other),
    }
}

/// A default must itself pass the field's rules, validated with no
/// surrounding record.
fn check_default(path: &str, field: &FieldConfig) -> Result<()> {
    let Some(default) = field.default_value.as_ref().filter(|v| !v.is_null()) else {
        return Ok(());
    };
    let empty_record = Value::Object(Map::new());
    validate_field(
        path,
        Some(default),
        field,
        &empty_record,
        &ValidateOptions::default(),
    )
    .map(|_| ())
    .map_err(|source| ConfigError::InvalidDefault {
        field: path.to_string(),
        source,
    })
}

fn forbidden(path: &str, rule: RuleName, reason: &str) -> ConfigError {
    ConfigError::ForbiddenRule {
        field: path.to_string(),
        rule,
        reason: reason.to_string(),
    }
}
