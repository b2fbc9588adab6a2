use fieldguard_core::{
    FieldConfig, Schema, StorageKind, ValidationError, ValueKind, display_value, is_blank,
    is_empty, measured_length, scalars_equal,
};
use serde_json::Value;

use crate::conditional::{check_conditionals, check_key_equals};
use crate::errors::ValidationOutcome;
use crate::formats::{email_violations, phone_violation};

/// Path reported for problems with the record itself.
pub const ROOT_PATH: &str = "(root)";

/// Options for a validation pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateOptions<'a> {
    /// Collect every violation instead of failing on the first one.
    pub return_errors: bool,
    /// Record that conditional rules resolve their targets against.
    /// Defaults to the record being validated.
    pub full_record: Option<&'a Value>,
}

impl<'a> ValidateOptions<'a> {
    /// Aggregation mode.
    pub fn collect() -> Self {
        Self {
            return_errors: true,
            full_record: None,
        }
    }

    pub fn with_full_record(mut self, full_record: &'a Value) -> Self {
        self.full_record = Some(full_record);
        self
    }
}

/// Validate a record, failing on the first violation.
pub fn validate(record: &Value, schema: &Schema) -> Result<(), ValidationError> {
    validate_with_options(record, schema, &ValidateOptions::default()).map(|_| ())
}

/// Validate a record and report every violation.
pub fn validate_collect(record: &Value, schema: &Schema) -> ValidationOutcome {
    match validate_with_options(record, schema, &ValidateOptions::collect()) {
        Ok(outcome) => outcome,
        Err(error) => {
            let mut outcome = ValidationOutcome::default();
            outcome.record(&error);
            outcome
        }
    }
}

/// Validate a record against a schema.
///
/// In aggregation mode the returned outcome holds every violation and the
/// call never fails. In fail-fast mode the first violation is returned as
/// the error and a successful call yields an empty outcome.
pub fn validate_with_options(
    record: &Value,
    schema: &Schema,
    options: &ValidateOptions<'_>,
) -> Result<ValidationOutcome, ValidationError> {
    let full_record = options.full_record.unwrap_or(record);
    let mut outcome = ValidationOutcome::default();
    let mut sink = Emitter::new(!options.return_errors, &mut outcome);

    if let Err(error) = validate_record(record, schema, None, full_record, &mut sink) {
        tracing::debug!(event = "record_rejected", path = %error.path);
        return Err(error);
    }

    tracing::debug!(
        event = "record_validated",
        did_fail = outcome.did_fail,
        failed_fields = outcome.fields.len()
    );
    Ok(outcome)
}

/// Validate one value against one field configuration.
///
/// `path` names the field in messages; `full_record` is what conditional
/// rules resolve against.
pub fn validate_field(
    path: &str,
    value: Option<&Value>,
    field: &FieldConfig,
    full_record: &Value,
    options: &ValidateOptions<'_>,
) -> Result<ValidationOutcome, ValidationError> {
    let full_record = options.full_record.unwrap_or(full_record);
    let mut outcome = ValidationOutcome::default();
    let mut sink = Emitter::new(!options.return_errors, &mut outcome);
    check_field(path, value, field, full_record, true, &mut sink)?;
    Ok(outcome)
}

/// Single reporting point for violations.
///
/// Fail-fast emitters turn the first violation into an `Err` that unwinds
/// the whole call tree through `?`; collecting emitters append to the shared
/// outcome and keep going.
pub(crate) struct Emitter<'o> {
    fail_fast: bool,
    outcome: &'o mut ValidationOutcome,
    first: Option<ValidationError>,
}

impl<'o> Emitter<'o> {
    fn new(fail_fast: bool, outcome: &'o mut ValidationOutcome) -> Self {
        Self {
            fail_fast,
            outcome,
            first: None,
        }
    }

    pub(crate) fn emit(&mut self, error: ValidationError) -> Result<(), ValidationError> {
        self.outcome.record(&error);
        if self.fail_fast {
            return Err(error);
        }
        if self.first.is_none() {
            self.first = Some(error);
        }
        Ok(())
    }

    /// Collecting emitter over the same outcome, for nested records.
    fn nested(&mut self) -> Emitter<'_> {
        Emitter::new(false, self.outcome)
    }

    /// Surface the first failure of a completed nested pass.
    fn absorb(&mut self, nested_first: Option<ValidationError>) -> Result<(), ValidationError> {
        let Some(error) = nested_first else {
            return Ok(());
        };
        if self.fail_fast {
            return Err(error);
        }
        if self.first.is_none() {
            self.first = Some(error);
        }
        Ok(())
    }
}

fn qualify(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}.{key}"),
        None => key.to_string(),
    }
}

fn validate_record(
    record: &Value,
    schema: &Schema,
    prefix: Option<&str>,
    full_record: &Value,
    sink: &mut Emitter<'_>,
) -> Result<(), ValidationError> {
    let Some(map) = record.as_object() else {
        return sink.emit(ValidationError::new(
            prefix.unwrap_or(ROOT_PATH),
            format!(
                "Expected an object but received {}.",
                ValueKind::of(Some(record))
            ),
        ));
    };

    let mut reported_missing: Vec<&str> = Vec::new();
    for (name, field) in schema.required_fields() {
        if !is_empty(map.get(name)) {
            continue;
        }
        if let Some(alias) = field.out_key()
            && !is_empty(map.get(alias))
        {
            continue;
        }
        sink.emit(ValidationError::missing(
            qualify(prefix, name),
            format!("Missing required key '{name}' in supplied object."),
        ))?;
        reported_missing.push(name);
    }

    for (key, value) in map {
        let (name, field) = match schema.get(key) {
            Some(field) => (key.as_str(), field),
            None => match schema.find_by_out_key(key) {
                Some((name, field)) => (name.as_str(), field),
                None => {
                    tracing::trace!(event = "unknown_key_skipped", key = %key);
                    continue;
                }
            },
        };
        // A blank required value was already reported as missing above.
        let report_missing = !reported_missing.contains(&name);
        check_field(
            &qualify(prefix, key),
            Some(value),
            field,
            full_record,
            report_missing,
            sink,
        )?;
    }

    // Absent fields still answer to conditional rules on other keys.
    for (name, field) in schema.iter() {
        let supplied = map.contains_key(name)
            || field.out_key().is_some_and(|alias| map.contains_key(alias));
        if supplied {
            continue;
        }
        check_field(&qualify(prefix, name), None, field, full_record, false, sink)?;
    }

    Ok(())
}

fn check_field(
    path: &str,
    value: Option<&Value>,
    field: &FieldConfig,
    full_record: &Value,
    report_missing: bool,
    sink: &mut Emitter<'_>,
) -> Result<(), ValidationError> {
    if field.is_hidden() {
        return Ok(());
    }

    if report_missing && !field.optional && is_blank(value) {
        sink.emit(ValidationError::missing(
            path,
            format!("Key '{path}' is a required field, but no value was received."),
        ))?;
    }

    if field.is_array && value.is_some_and(|v| !v.is_array()) {
        sink.emit(ValidationError::new(
            path,
            format!("Key '{path}' was specified as an array field, but an array was not received."),
        ))?;
    }

    // Conditional rules run before the optional short-circuit: they can make
    // an optional field required.
    check_conditionals(path, value, &field.rules, full_record, sink)?;
    check_key_equals(path, value, &field.rules, full_record, sink)?;

    if field.optional && is_empty(value) {
        return Ok(());
    }
    let Some(value) = value.filter(|v| !is_blank(Some(*v))) else {
        return Ok(());
    };

    if let Some(storage) = field.storage {
        if !check_kind(path, value, storage, field.is_array, sink)? {
            return Ok(());
        }
        if storage == StorageKind::Object {
            check_nested(path, value, field, full_record, sink)?;
        }
    }

    check_enum(path, value, field, sink)?;
    check_rules(path, value, field, sink)
}

fn kind_matches(storage: StorageKind, value: &Value) -> bool {
    match storage {
        kind if kind.is_string_like() => value.is_string(),
        StorageKind::Number => value.is_number(),
        StorageKind::Boolean => value.is_boolean(),
        StorageKind::Object => value.is_object(),
        _ => false,
    }
}

/// Returns whether later checks should run on the value.
fn check_kind(
    path: &str,
    value: &Value,
    storage: StorageKind,
    is_array: bool,
    sink: &mut Emitter<'_>,
) -> Result<bool, ValidationError> {
    let valid_array = is_array && value.is_array();
    if !kind_matches(storage, value) && !valid_array {
        let expected = if is_array { "array" } else { storage.as_str() };
        sink.emit(ValidationError::new(
            path,
            format!(
                "Key '{path}' was specified as type {expected} but received {}.",
                ValueKind::of(Some(value))
            ),
        ))?;
        return Ok(false);
    }

    if let Some(items) = value.as_array().filter(|_| is_array) {
        for (index, item) in items.iter().enumerate() {
            if !kind_matches(storage, item) {
                sink.emit(ValidationError::new(
                    path,
                    format!(
                        "Value at index {index} for key '{path}' was specified as type {storage} but received {}.",
                        ValueKind::of(Some(item))
                    ),
                ))?;
            }
        }
    }
    Ok(true)
}

/// Validate an object value (or each object in an array) against the
/// nested schema, collecting into the shared outcome.
fn check_nested(
    path: &str,
    value: &Value,
    field: &FieldConfig,
    full_record: &Value,
    sink: &mut Emitter<'_>,
) -> Result<(), ValidationError> {
    let Some(nested_schema) = field.nested_schema.as_ref() else {
        return Ok(());
    };

    let first = {
        let mut nested = sink.nested();
        match value {
            Value::Object(_) => {
                validate_record(value, nested_schema, Some(path), full_record, &mut nested)?;
            }
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate().filter(|(_, item)| item.is_object()) {
                    let item_path = format!("{path}.{index}");
                    validate_record(item, nested_schema, Some(&item_path), full_record, &mut nested)?;
                }
            }
            _ => {}
        }
        nested.first
    };
    sink.absorb(first)
}

fn check_enum(
    path: &str,
    value: &Value,
    field: &FieldConfig,
    sink: &mut Emitter<'_>,
) -> Result<(), ValidationError> {
    let Some(allowed) = field.enum_values.as_ref().and_then(|source| source.literals()) else {
        return Ok(());
    };
    let contains = |candidate: &Value| allowed.iter().any(|option| scalars_equal(option, candidate));

    if allowed.is_empty() {
        return sink.emit(ValidationError::new(
            path,
            format!(
                "Key {path} specified an enum with no values, preventing this value from being set. Please delete the enum field, add values to the enum, or make sure this key is null or undefined."
            ),
        ));
    }

    match value {
        Value::Array(items) => {
            for item in items.iter().filter(|item| !contains(item)) {
                sink.emit(ValidationError::new(
                    path,
                    format!(
                        "Value '{}' specified in array for key '{path}' is not an allowed value according to the supplied enum.",
                        display_value(Some(item))
                    ),
                ))?;
            }
        }
        scalar if !contains(scalar) => {
            sink.emit(ValidationError::new(
                path,
                format!(
                    "Key '{path}' expected a specific value from the specified enum. Instead received '{}'.",
                    display_value(Some(scalar))
                ),
            ))?;
        }
        _ => {}
    }
    Ok(())
}

/// Scalar values a rule applies to: the value itself, or each array item.
fn each_item(value: &Value) -> impl Iterator<Item = &Value> {
    let items: &[Value] = match value {
        Value::Array(items) => items,
        scalar => std::slice::from_ref(scalar),
    };
    items.iter()
}

fn check_rules(
    path: &str,
    value: &Value,
    field: &FieldConfig,
    sink: &mut Emitter<'_>,
) -> Result<(), ValidationError> {
    let rules = &field.rules;

    if field.storage == Some(StorageKind::Number) {
        for number in each_item(value).filter_map(Value::as_f64) {
            if let Some(min) = rules.min
                && number < min
            {
                sink.emit(ValidationError::new(
                    path,
                    format!("Key '{path}' has a minimum value of '{min}' but received '{number}'."),
                ))?;
            }
            if let Some(max) = rules.max
                && number > max
            {
                sink.emit(ValidationError::new(
                    path,
                    format!("Key '{path}' has a maximum value of '{max}' but received '{number}'."),
                ))?;
            }
        }
    }

    if let Some(length) = measured_length(value) {
        check_length(path, length, value.is_array(), field, sink)?;
    }

    if let Some(expected) = rules.equals.as_ref().filter(|v| !v.is_null())
        && !scalars_equal(value, expected)
    {
        sink.emit(ValidationError::new(
            path,
            format!("Key '{path}' should equal '{}'.", display_value(Some(expected))),
        ))?;
    }
    if let Some(forbidden) = rules.not_equals.as_ref().filter(|v| !v.is_null())
        && scalars_equal(value, forbidden)
    {
        sink.emit(ValidationError::new(
            path,
            format!("Key '{path}' should not equal '{}'.", display_value(Some(forbidden))),
        ))?;
    }

    if let Some(rule) = rules.is_email.as_ref().filter(|rule| rule.is_enabled()) {
        for address in each_item(value).filter_map(Value::as_str) {
            for message in email_violations(path, address, rule) {
                sink.emit(ValidationError::new(path, message))?;
            }
        }
    }

    if let Some(rule) = rules.is_phone.as_ref().filter(|rule| rule.is_enabled()) {
        for number in each_item(value).filter_map(Value::as_str) {
            if let Some(message) = phone_violation(path, number, rule) {
                sink.emit(ValidationError::new(path, message))?;
            }
        }
    }

    Ok(())
}

fn check_length(
    path: &str,
    length: usize,
    is_array: bool,
    field: &FieldConfig,
    sink: &mut Emitter<'_>,
) -> Result<(), ValidationError> {
    let rules = &field.rules;
    let unit = if is_array { "items" } else { "characters" };

    if let Some(exact) = rules.length
        && length != exact
    {
        sink.emit(ValidationError::new(
            path,
            format!("Key '{path}' should have an exact length of {exact}, but received {length}."),
        ))?;
    }

    match (rules.min_length, rules.max_length) {
        (Some(min), Some(max)) => {
            if length < min || length > max {
                sink.emit(ValidationError::new(
                    path,
                    format!(
                        "Key '{path}' should have a length between {min} and {max} {unit}, but received {length} {unit}."
                    ),
                ))?;
            }
        }
        (None, Some(max)) if length > max => {
            sink.emit(ValidationError::new(
                path,
                format!("Key '{path}' should not exceed a length of {max}, but received {length}."),
            ))?;
        }
        (Some(min), None) if length < min => {
            sink.emit(ValidationError::new(
                path,
                format!(
                    "Key '{path}' should not have a length less than {min}, but received {length}."
                ),
            ))?;
        }
        _ => {}
    }
    Ok(())
}
