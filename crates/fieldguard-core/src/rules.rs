use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::RuleName;

/// Email rule: a plain flag or a set of forbidden domains/TLDs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum EmailRule {
    Flag(bool),
    Options(EmailOptions),
}

/// Domain restrictions for an email rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EmailOptions {
    /// Domains (the part between `@` and the last `.`) that are rejected.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forbidden_domains: Vec<String>,
    /// Top-level domains that are rejected, e.g. `["io", "af"]`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forbidden_tlds: Vec<String>,
}

impl EmailRule {
    pub fn is_enabled(&self) -> bool {
        match self {
            EmailRule::Flag(enabled) => *enabled,
            EmailRule::Options(_) => true,
        }
    }

    pub fn options(&self) -> Option<&EmailOptions> {
        match self {
            EmailRule::Flag(_) => None,
            EmailRule::Options(options) => Some(options),
        }
    }
}

/// Phone rule: a plain flag or phone format options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum PhoneRule {
    Flag(bool),
    Options(PhoneOptions),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PhoneOptions {
    /// Require a leading `+` country code.
    #[serde(default)]
    pub include_country_code: bool,
}

impl PhoneRule {
    pub fn is_enabled(&self) -> bool {
        match self {
            PhoneRule::Flag(enabled) => *enabled,
            PhoneRule::Options(_) => true,
        }
    }

    pub fn requires_country_code(&self) -> bool {
        matches!(
            self,
            PhoneRule::Options(PhoneOptions {
                include_country_code: true
            })
        )
    }
}

/// Single-target equality condition used by the `*_if_key_equals` rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct KeyEquals {
    /// Dot/bracket path resolved against the full record.
    pub key: String,
    /// Literal to compare against; an array means "any of".
    pub value: Value,
}

/// Aggregate condition over the emptiness of a list of target paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    AllPresent,
    AnyPresent,
    AnyEmpty,
    AllEmpty,
    NoneEmpty,
}

impl Condition {
    /// Evaluate the condition given each target's presence.
    pub fn holds(self, presence: &[bool]) -> bool {
        match self {
            Condition::AllPresent | Condition::NoneEmpty => presence.iter().all(|p| *p),
            Condition::AnyPresent => presence.iter().any(|p| *p),
            Condition::AnyEmpty => presence.iter().any(|p| !*p),
            Condition::AllEmpty => presence.iter().all(|p| !*p),
        }
    }

    /// Human phrasing used in violation messages.
    pub fn describe(self) -> &'static str {
        match self {
            Condition::AllPresent => "all of the keys",
            Condition::AnyPresent => "any of the keys",
            Condition::AnyEmpty => "any of the keys",
            Condition::AllEmpty => "all of the keys",
            Condition::NoneEmpty => "none of the keys",
        }
    }

    pub fn state(self) -> &'static str {
        match self {
            Condition::AllPresent | Condition::AnyPresent => "present",
            Condition::AnyEmpty | Condition::AllEmpty | Condition::NoneEmpty => "empty",
        }
    }
}

/// What a triggered conditional rule demands of the current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demand {
    Present,
    Empty,
}

/// One configured conditional-presence rule, borrowed from [`Rules`].
#[derive(Debug, Clone, Copy)]
pub struct ConditionalRule<'a> {
    pub name: RuleName,
    pub condition: Condition,
    pub demand: Demand,
    pub targets: &'a [String],
}

/// Validation rules for a single field. Every rule is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Rules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_equals: Option<Value>,
    /// Exact length of a string (in characters) or array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_email: Option<EmailRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_phone: Option<PhoneRule>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ensure_present_if_all_present: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ensure_present_if_any_present: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ensure_present_if_any_empty: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ensure_present_if_all_empty: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ensure_present_if_none_empty: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ensure_empty_if_all_present: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ensure_empty_if_any_present: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ensure_empty_if_any_empty: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ensure_empty_if_all_empty: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ensure_empty_if_none_empty: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ensure_present_if_key_equals: Option<KeyEquals>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ensure_empty_if_key_equals: Option<KeyEquals>,
}

impl Rules {
    /// Whether a rule is configured. Empty lists, `null` literals, and
    /// `false` flags count as unset.
    ///
    /// `Enum` and `NestedSchema` live on the field itself and are never
    /// reported as set here.
    pub fn is_set(&self, rule: RuleName) -> bool {
        match rule {
            RuleName::Enum | RuleName::NestedSchema => false,
            RuleName::Min => self.min.is_some(),
            RuleName::Max => self.max.is_some(),
            RuleName::Equals => self.equals.as_ref().is_some_and(|v| !v.is_null()),
            RuleName::NotEquals => self.not_equals.as_ref().is_some_and(|v| !v.is_null()),
            RuleName::Length => self.length.is_some(),
            RuleName::MinLength => self.min_length.is_some(),
            RuleName::MaxLength => self.max_length.is_some(),
            RuleName::IsEmail => self.is_email.as_ref().is_some_and(EmailRule::is_enabled),
            RuleName::IsPhone => self.is_phone.as_ref().is_some_and(PhoneRule::is_enabled),
            RuleName::IsPhoneCountryCode => self
                .is_phone
                .as_ref()
                .is_some_and(PhoneRule::requires_country_code),
            RuleName::EnsurePresentIfKeyEquals => self.ensure_present_if_key_equals.is_some(),
            RuleName::EnsureEmptyIfKeyEquals => self.ensure_empty_if_key_equals.is_some(),
            conditional => self
                .conditionals()
                .any(|rule| rule.name == conditional && !rule.targets.is_empty()),
        }
    }

    /// All ten conditional-presence rules, including unset ones.
    pub fn conditionals(&self) -> impl Iterator<Item = ConditionalRule<'_>> {
        use Condition::*;
        use Demand::*;

        [
            (RuleName::EnsurePresentIfAllPresent, AllPresent, Present, &self.ensure_present_if_all_present),
            (RuleName::EnsurePresentIfAnyPresent, AnyPresent, Present, &self.ensure_present_if_any_present),
            (RuleName::EnsurePresentIfAnyEmpty, AnyEmpty, Present, &self.ensure_present_if_any_empty),
            (RuleName::EnsurePresentIfAllEmpty, AllEmpty, Present, &self.ensure_present_if_all_empty),
            (RuleName::EnsurePresentIfNoneEmpty, NoneEmpty, Present, &self.ensure_present_if_none_empty),
            (RuleName::EnsureEmptyIfAllPresent, AllPresent, Empty, &self.ensure_empty_if_all_present),
            (RuleName::EnsureEmptyIfAnyPresent, AnyPresent, Empty, &self.ensure_empty_if_any_present),
            (RuleName::EnsureEmptyIfAnyEmpty, AnyEmpty, Empty, &self.ensure_empty_if_any_empty),
            (RuleName::EnsureEmptyIfAllEmpty, AllEmpty, Empty, &self.ensure_empty_if_all_empty),
            (RuleName::EnsureEmptyIfNoneEmpty, NoneEmpty, Empty, &self.ensure_empty_if_none_empty),
        ]
        .into_iter()
        .map(|(name, condition, demand, targets)| ConditionalRule {
            name,
            condition,
            demand,
            targets: targets.as_slice(),
        })
    }

    /// Both `*_if_key_equals` rules paired with their demand.
    pub fn key_equals(&self) -> impl Iterator<Item = (RuleName, Demand, &KeyEquals)> {
        [
            (
                RuleName::EnsurePresentIfKeyEquals,
                Demand::Present,
                self.ensure_present_if_key_equals.as_ref(),
            ),
            (
                RuleName::EnsureEmptyIfKeyEquals,
                Demand::Empty,
                self.ensure_empty_if_key_equals.as_ref(),
            ),
        ]
        .into_iter()
        .filter_map(|(name, demand, rule)| rule.map(|rule| (name, demand, rule)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_email_flag_and_options() {
        let flag: EmailRule = serde_json::from_value(json!(true)).unwrap();
        assert!(flag.is_enabled());

        let options: EmailRule =
            serde_json::from_value(json!({"forbidden_domains": ["gail"]})).unwrap();
        assert_eq!(
            options.options().map(|o| o.forbidden_domains.clone()),
            Some(vec!["gail".to_string()])
        );
    }

    #[test]
    fn false_flags_and_empty_lists_are_unset() {
        let rules: Rules = serde_json::from_value(json!({
            "is_phone": false,
            "ensure_empty_if_any_present": []
        }))
        .unwrap();
        assert!(!rules.is_set(RuleName::IsPhone));
        assert!(!rules.is_set(RuleName::EnsureEmptyIfAnyPresent));
    }

    #[test]
    fn zero_bound_counts_as_set() {
        let rules = Rules {
            min: Some(0.0),
            ..Rules::default()
        };
        assert!(rules.is_set(RuleName::Min));
    }

    #[test]
    fn unknown_rule_keys_are_rejected() {
        assert!(serde_json::from_value::<Rules>(json!({ "minimum": 1 })).is_err());
        assert!(serde_json::from_value::<Rules>(json!({ "is_email": { "forbiden_domains": ["x"] } })).is_err());
    }

    #[test]
    fn conditions_follow_target_presence() {
        assert!(Condition::AllPresent.holds(&[true, true]));
        assert!(!Condition::AllPresent.holds(&[true, false]));
        assert!(Condition::AnyEmpty.holds(&[true, false]));
        assert!(Condition::AllEmpty.holds(&[false, false]));
        assert!(!Condition::AnyPresent.holds(&[false]));
    }

    #[test]
    fn country_code_flag_is_nested_in_phone_options() {
        let rules: Rules =
            serde_json::from_value(json!({"is_phone": {"include_country_code": true}})).unwrap();
        assert!(rules.is_set(RuleName::IsPhone));
        assert!(rules.is_set(RuleName::IsPhoneCountryCode));
    }
}
