//! Email and phone format rules.

use std::sync::LazyLock;

use fieldguard_core::{EmailRule, PhoneRule};
use regex::Regex;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));
static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("digits pattern is valid"));
static COUNTRY_CODE_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[0-9]+$").expect("country code pattern is valid"));

/// Split an address into `(domain, tld)`.
///
/// The domain is everything between the first `@` and the last `.`; the TLD
/// is everything after the last `.`. `None` when the `@` does not come
/// before the last `.`.
pub fn split_email(address: &str) -> Option<(&str, &str)> {
    let at = address.find('@')?;
    let dot = address.rfind('.')?;
    if at > dot {
        return None;
    }
    Some((&address[at + 1..dot], &address[dot + 1..]))
}

/// Messages for every way `address` breaks the email rule.
pub fn email_violations(key: &str, address: &str, rule: &EmailRule) -> Vec<String> {
    if !EMAIL_SHAPE.is_match(address) {
        return vec![format!(
            "Key '{key}' was specified to be an email but received '{address}'."
        )];
    }

    let Some((domain, tld)) = split_email(address) else {
        return vec![format!("Key '{key}' was passed an invalid email '{address}'.")];
    };
    if domain.is_empty() {
        return vec![format!("Key '{key}' was passed an invalid email '{address}'.")];
    }

    let mut messages = Vec::new();
    if let Some(options) = rule.options() {
        if options.forbidden_domains.iter().any(|d| d == domain) {
            messages.push(format!(
                "Key '{key}' was passed an email with a forbidden domain '{domain}'."
            ));
        }
        if options.forbidden_tlds.iter().any(|t| t == tld) {
            messages.push(format!(
                "Key '{key}' was passed an email with an invalid TLD '{tld}'."
            ));
        }
    }
    messages
}

/// Message when `number` breaks the phone rule.
pub fn phone_violation(key: &str, number: &str, rule: &PhoneRule) -> Option<String> {
    if rule.requires_country_code() {
        if COUNTRY_CODE_DIGITS.is_match(number) {
            return None;
        }
        return Some(format!(
            "Phone number for key '{key}' must be a string consisting of numbers and a country code denoted with a '+' at the beginning, received '{number}'."
        ));
    }

    if DIGITS.is_match(number) {
        None
    } else {
        Some(format!(
            "Phone number for key '{key}' must be a string consisting only of numbers, received '{number}'."
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldguard_core::{EmailOptions, PhoneOptions};

    fn forbid_domain(domain: &str) -> EmailRule {
        EmailRule::Options(EmailOptions {
            forbidden_domains: vec![domain.to_string()],
            forbidden_tlds: Vec::new(),
        })
    }

    #[test]
    fn splits_domain_and_tld_on_last_dot() {
        assert_eq!(split_email("a@mail.example.com"), Some(("mail.example", "com")));
        assert_eq!(split_email("first.last@mail.com"), Some(("mail", "com")));
        assert_eq!(split_email("a.b@c"), None);
    }

    #[test]
    fn rejects_forbidden_domain() {
        let messages = email_violations("email", "a@gail.com", &forbid_domain("gail"));
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("forbidden domain 'gail'"));
        assert!(email_violations("email", "a@mail.com", &forbid_domain("gail")).is_empty());
    }

    #[test]
    fn rejects_forbidden_tld() {
        let rule = EmailRule::Options(EmailOptions {
            forbidden_domains: Vec::new(),
            forbidden_tlds: vec!["io".to_string()],
        });
        let messages = email_violations("email", "dev@startup.io", &rule);
        assert_eq!(messages, vec!["Key 'email' was passed an email with an invalid TLD 'io'."]);
    }

    #[test]
    fn rejects_malformed_addresses() {
        let rule = EmailRule::Flag(true);
        assert_eq!(email_violations("email", "not-an-email", &rule).len(), 1);
        assert_eq!(email_violations("email", "a b@mail.com", &rule).len(), 1);
        assert!(email_violations("email", "first.last@mail.com", &rule).is_empty());
    }

    #[test]
    fn phone_digits_only_by_default() {
        let rule = PhoneRule::Flag(true);
        assert!(phone_violation("phone", "5551234", &rule).is_none());
        assert!(phone_violation("phone", "+15551234", &rule).is_some());
        assert!(phone_violation("phone", "555-1234", &rule).is_some());
    }

    #[test]
    fn country_code_requires_leading_plus() {
        let rule = PhoneRule::Options(PhoneOptions {
            include_country_code: true,
        });
        assert!(phone_violation("phone", "+15551234", &rule).is_none());
        assert!(phone_violation("phone", "15551234", &rule).is_some());
        assert!(phone_violation("phone", "1+5551234", &rule).is_some());
    }

    #[test]
    fn phone_accepts_ascii_digits_only() {
        let rule = PhoneRule::Flag(true);
        assert!(phone_violation("phone", "\u{665}\u{665}\u{665}", &rule).is_some());
        assert!(phone_violation("phone", "\u{ff15}\u{ff15}\u{ff15}", &rule).is_some());

        let with_code = PhoneRule::Options(PhoneOptions {
            include_country_code: true,
        });
        assert!(phone_violation("phone", "+\u{665}\u{665}\u{665}", &with_code).is_some());
    }
}
