//! Cross-field rules: conditional presence and key equality.
//!
//! Every target path is resolved against the full top-level record, never
//! against the nested object currently being validated.

use fieldguard_core::{
    ConditionalRule, Demand, KeyEquals, RuleName, Rules, ValidationError, display_value,
    is_empty, is_present, resolve_path, scalars_equal,
};
use serde_json::Value;

use crate::validate::Emitter;

/// Outcome of comparing a resolved target against a `*_if_key_equals` literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyMatch {
    Matched,
    NotMatched,
    /// The target is an array but the rule value is a scalar.
    Misconfigured,
}

pub(crate) fn compare_key(actual: Option<&Value>, expected: &Value) -> KeyMatch {
    let actual = actual.unwrap_or(&Value::Null);
    let matched = match (actual, expected) {
        (Value::Array(_), Value::Array(_)) => scalars_equal(actual, expected),
        (Value::Array(_), _) => return KeyMatch::Misconfigured,
        (_, Value::Array(options)) => options.iter().any(|option| scalars_equal(actual, option)),
        _ => scalars_equal(actual, expected),
    };
    if matched {
        KeyMatch::Matched
    } else {
        KeyMatch::NotMatched
    }
}

pub(crate) fn check_conditionals(
    path: &str,
    value: Option<&Value>,
    rules: &Rules,
    full_record: &Value,
    sink: &mut Emitter<'_>,
) -> Result<(), ValidationError> {
    for rule in rules.conditionals().filter(|rule| !rule.targets.is_empty()) {
        let presence: Vec<bool> = rule
            .targets
            .iter()
            .map(|target| is_present(full_record, target))
            .collect();
        if !rule.condition.holds(&presence) {
            continue;
        }
        if let Some(message) = conditional_violation(path, value, &rule) {
            sink.emit(ValidationError::new(path, message))?;
        }
    }
    Ok(())
}

fn conditional_violation(path: &str, value: Option<&Value>, rule: &ConditionalRule<'_>) -> Option<String> {
    let targets = rule.targets.join(", ");
    let scope = rule.condition.describe();
    let state = rule.condition.state();
    match rule.demand {
        Demand::Present if is_empty(value) => Some(format!(
            "Key {path} must have a value if {scope} {targets} are {state}, received {}.",
            display_value(value)
        )),
        Demand::Empty if !is_empty(value) => Some(format!(
            "Key {path} must be empty if {scope} {targets} are {state}, received {}.",
            display_value(value)
        )),
        _ => None,
    }
}

pub(crate) fn check_key_equals(
    path: &str,
    value: Option<&Value>,
    rules: &Rules,
    full_record: &Value,
    sink: &mut Emitter<'_>,
) -> Result<(), ValidationError> {
    for (name, demand, rule) in rules.key_equals() {
        let actual = resolve_path(full_record, &rule.key);
        match compare_key(actual, &rule.value) {
            KeyMatch::NotMatched => {}
            KeyMatch::Misconfigured => {
                sink.emit(ValidationError::new(path, misconfigured(path, name, rule)))?;
            }
            KeyMatch::Matched => {
                let expected = display_value(Some(&rule.value));
                let target = &rule.key;
                match demand {
                    Demand::Present if is_empty(value) => {
                        sink.emit(ValidationError::new(
                            path,
                            format!("{path} must have a value when {target} has a value of {expected}"),
                        ))?;
                    }
                    Demand::Empty if !is_empty(value) => {
                        sink.emit(ValidationError::new(
                            path,
                            format!("{path} must not have a value when {target} has a value of {expected}"),
                        ))?;
                    }
                    _ => {}
                }
            }
        }
    }
    Ok(())
}

fn misconfigured(path: &str, name: RuleName, rule: &KeyEquals) -> String {
    format!(
        "Invalid key configuration for key {path} in field '{name}': '{}' resolved to an array but the rule value is not an array.",
        rule.key
    )
}
