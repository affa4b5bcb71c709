//! Field rules: the default per-field validator.
//!
//! The form aggregator only consumes validity flags. These rules produce them
//! for the sign-in form the same way the app's text inputs check themselves on
//! every keystroke.

use crate::auth::AuthField;
use crate::environment::FieldValidator;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Validation rules for one field
///
/// Rules combine with AND; a field with no rules is always valid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldRules {
    /// Value must contain something other than whitespace
    pub required: bool,
    /// Value must look like an email address
    pub email: bool,
    /// Minimum length in characters
    pub min_length: Option<usize>,
    /// Hint shown under the field while it is invalid
    pub error_text: String,
}

impl FieldRules {
    /// Rules for an email field
    #[must_use]
    pub fn email_address() -> Self {
        Self {
            required: true,
            email: true,
            min_length: None,
            error_text: "Enter a valid email address.".to_string(),
        }
    }

    /// Rules for a password field with the given minimum length
    #[must_use]
    pub fn password(min_length: usize) -> Self {
        Self {
            required: true,
            email: false,
            min_length: Some(min_length),
            error_text: format!("Enter a password of at least {min_length} characters."),
        }
    }

    /// Check a raw value against every rule
    #[must_use]
    pub fn validate(&self, value: &str) -> bool {
        if self.required && value.trim().is_empty() {
            return false;
        }
        if self.email && !is_email(value) {
            return false;
        }
        if let Some(min) = self.min_length {
            if value.chars().count() < min {
                return false;
            }
        }
        true
    }
}

fn is_email(value: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    let re = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok()
    });
    re.as_ref().is_some_and(|re| re.is_match(value))
}

/// Rules for the sign-in / sign-up form
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthFormRules {
    /// Rules for [`AuthField::Email`]
    pub email: FieldRules,
    /// Rules for [`AuthField::Password`]
    pub password: FieldRules,
}

impl AuthFormRules {
    /// Rules for one field
    #[must_use]
    pub const fn rules(&self, field: AuthField) -> &FieldRules {
        match field {
            AuthField::Email => &self.email,
            AuthField::Password => &self.password,
        }
    }
}

impl Default for AuthFormRules {
    fn default() -> Self {
        Self {
            email: FieldRules::email_address(),
            password: FieldRules::password(6),
        }
    }
}

impl FieldValidator<AuthField> for AuthFormRules {
    fn is_valid(&self, field: AuthField, value: &str) -> bool {
        self.rules(field).validate(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    #[test]
    fn no_rules_accepts_anything() {
        assert!(FieldRules::default().validate(""));
    }

    #[test]
    fn required_rejects_whitespace() {
        let rules = FieldRules {
            required: true,
            ..FieldRules::default()
        };
        assert!(!rules.validate("   "));
        assert!(rules.validate(" x "));
    }

    #[test]
    fn email_shapes() {
        let rules = FieldRules::email_address();
        assert!(rules.validate("a@b.com"));
        assert!(rules.validate("First.Last@Shop.co.uk"));
        assert!(rules.validate("a@b.c"));
        assert!(rules.validate("ana@florării.ro"));
        assert!(!rules.validate("a@b"));
        assert!(!rules.validate("a@b."));
        assert!(!rules.validate("a b@c.com"));
        assert!(!rules.validate("@c.com"));
        assert!(!rules.validate("a@@c.com"));
        assert!(!rules.validate(""));
    }

    #[test]
    fn password_minimum_length_counts_characters() {
        let rules = FieldRules::password(6);
        assert!(!rules.validate("12345"));
        assert!(rules.validate("123456"));
        assert!(rules.validate("ăîșțâă"));
    }

    #[test]
    fn auth_rules_dispatch_by_field() {
        let rules = AuthFormRules::default();
        assert!(rules.is_valid(AuthField::Email, "a@b.com"));
        assert!(!rules.is_valid(AuthField::Email, "123456"));
        assert!(rules.is_valid(AuthField::Password, "123456"));
        assert!(!rules.is_valid(AuthField::Password, "a@b"));
    }

    #[test]
    fn rules_deserialize_with_defaults() {
        let rules: FieldRules = serde_json::from_str(r#"{"required": true, "min_length": 8}"#).unwrap();
        assert!(rules.required);
        assert!(!rules.email);
        assert_eq!(rules.min_length, Some(8));
        assert!(rules.error_text.is_empty());
    }
}
