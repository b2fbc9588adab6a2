use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Storage kind declared for a field.
///
/// `date`, `datetime`, and `time` are carried as strings on the wire and
/// validate exactly like `string`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    String,
    Number,
    Boolean,
    Object,
    Date,
    Datetime,
    Time,
}

impl StorageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKind::String => "string",
            StorageKind::Number => "number",
            StorageKind::Boolean => "boolean",
            StorageKind::Object => "object",
            StorageKind::Date => "date",
            StorageKind::Datetime => "datetime",
            StorageKind::Time => "time",
        }
    }

    /// True for every kind whose values are strings.
    pub fn is_string_like(self) -> bool {
        matches!(
            self,
            StorageKind::String | StorageKind::Date | StorageKind::Datetime | StorageKind::Time
        )
    }

    /// Rules that may never be set on a field of this kind.
    pub fn forbidden_rules(self) -> &'static [RuleName] {
        match self {
            StorageKind::String => &[RuleName::Min, RuleName::Max],
            StorageKind::Number => &[
                RuleName::IsEmail,
                RuleName::IsPhoneCountryCode,
                RuleName::IsPhone,
            ],
            StorageKind::Object => &[
                RuleName::Enum,
                RuleName::Min,
                RuleName::Max,
                RuleName::Equals,
                RuleName::IsEmail,
                RuleName::IsPhone,
            ],
            StorageKind::Boolean => &[
                RuleName::Enum,
                RuleName::Min,
                RuleName::Max,
                RuleName::IsEmail,
                RuleName::IsPhone,
            ],
            StorageKind::Date | StorageKind::Datetime | StorageKind::Time => &[],
        }
    }

    /// Whether `length`, `min_length`, and `max_length` are meaningful.
    pub fn allows_length(self, is_array: bool) -> bool {
        self == StorageKind::String || is_array
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of a configurable rule, as it appears in a field configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleName {
    Enum,
    NestedSchema,
    Min,
    Max,
    Equals,
    NotEquals,
    Length,
    MinLength,
    MaxLength,
    IsEmail,
    IsPhone,
    IsPhoneCountryCode,
    EnsurePresentIfAllPresent,
    EnsurePresentIfAnyPresent,
    EnsurePresentIfAnyEmpty,
    EnsurePresentIfAllEmpty,
    EnsurePresentIfNoneEmpty,
    EnsureEmptyIfAllPresent,
    EnsureEmptyIfAnyPresent,
    EnsureEmptyIfAnyEmpty,
    EnsureEmptyIfAllEmpty,
    EnsureEmptyIfNoneEmpty,
    EnsurePresentIfKeyEquals,
    EnsureEmptyIfKeyEquals,
}

impl RuleName {
    /// Conditional rules that force a field empty; illegal on required fields.
    pub const ENSURE_EMPTY: [RuleName; 5] = [
        RuleName::EnsureEmptyIfAnyPresent,
        RuleName::EnsureEmptyIfAllPresent,
        RuleName::EnsureEmptyIfAllEmpty,
        RuleName::EnsureEmptyIfAnyEmpty,
        RuleName::EnsureEmptyIfNoneEmpty,
    ];

    pub const LENGTH: [RuleName; 3] = [RuleName::Length, RuleName::MinLength, RuleName::MaxLength];

    /// Dotted location of the rule inside a field configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            RuleName::Enum => "enum",
            RuleName::NestedSchema => "nested_schema",
            RuleName::Min => "rules.min",
            RuleName::Max => "rules.max",
            RuleName::Equals => "rules.equals",
            RuleName::NotEquals => "rules.not_equals",
            RuleName::Length => "rules.length",
            RuleName::MinLength => "rules.min_length",
            RuleName::MaxLength => "rules.max_length",
            RuleName::IsEmail => "rules.is_email",
            RuleName::IsPhone => "rules.is_phone",
            RuleName::IsPhoneCountryCode => "rules.is_phone.include_country_code",
            RuleName::EnsurePresentIfAllPresent => "rules.ensure_present_if_all_present",
            RuleName::EnsurePresentIfAnyPresent => "rules.ensure_present_if_any_present",
            RuleName::EnsurePresentIfAnyEmpty => "rules.ensure_present_if_any_empty",
            RuleName::EnsurePresentIfAllEmpty => "rules.ensure_present_if_all_empty",
            RuleName::EnsurePresentIfNoneEmpty => "rules.ensure_present_if_none_empty",
            RuleName::EnsureEmptyIfAllPresent => "rules.ensure_empty_if_all_present",
            RuleName::EnsureEmptyIfAnyPresent => "rules.ensure_empty_if_any_present",
            RuleName::EnsureEmptyIfAnyEmpty => "rules.ensure_empty_if_any_empty",
            RuleName::EnsureEmptyIfAllEmpty => "rules.ensure_empty_if_all_empty",
            RuleName::EnsureEmptyIfNoneEmpty => "rules.ensure_empty_if_none_empty",
            RuleName::EnsurePresentIfKeyEquals => "rules.ensure_present_if_key_equals",
            RuleName::EnsureEmptyIfKeyEquals => "rules.ensure_empty_if_key_equals",
        }
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
