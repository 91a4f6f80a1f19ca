//! Field constraint rules shared by the form controller and the submission
//! endpoint. Both sides evaluate the exact same rule set, so client-side
//! hints and server-side enforcement cannot diverge.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").unwrap());

pub static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

const REQUIRED_MESSAGE: &str = "This field is required";
const PATTERN_MESSAGE: &str = "Invalid format";

/// Constraints for a single field. Checks are evaluated in declaration order
/// and stop at the first violation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldRules {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<&'static Regex>,
    pub custom: Option<fn(&str) -> Option<String>>,
}

/// An ordered mapping from field name to its [`FieldRules`].
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<(&'static str, FieldRules)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, field: &'static str, rules: FieldRules) -> Self {
        self.rules.push((field, rules));
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldRules> {
        self.rules
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, rules)| rules)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Result of validating a full form. Contains one entry per violating field,
/// in submission order; an empty list means the form is valid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }
}

/// Validates a single field value against the rule set.
///
/// Returns `None` if the value is valid or the field has no rules. Checks
/// short-circuit: required, then (for non-empty values only) minimum length,
/// maximum length, pattern, and finally the custom predicate.
pub fn validate_field(field: &str, value: &str, rules: &RuleSet) -> Option<String> {
    let rule = rules.get(field)?;

    if rule.required && value.trim().is_empty() {
        return Some(REQUIRED_MESSAGE.into());
    }

    // Optional fields are valid when left empty.
    if value.trim().is_empty() {
        return None;
    }

    let length = value.chars().count();

    if let Some(min) = rule.min_length {
        if length < min {
            return Some(format!("Minimum length not met (minimum {min} characters)"));
        }
    }

    if let Some(max) = rule.max_length {
        if length > max {
            return Some(format!("Maximum length exceeded (maximum {max} characters)"));
        }
    }

    if let Some(pattern) = rule.pattern {
        if !pattern.is_match(value) {
            return Some(PATTERN_MESSAGE.into());
        }
    }

    if let Some(custom) = rule.custom {
        if let Some(message) = custom(value) {
            return Some(message);
        }
    }

    None
}

/// Validates every `(field, value)` pair against the rule set. Fields without
/// a matching rule are accepted unchanged.
pub fn validate_form<'a>(
    values: impl IntoIterator<Item = (&'a str, &'a str)>,
    rules: &RuleSet,
) -> ValidationReport {
    ValidationReport {
        errors: values
            .into_iter()
            .filter_map(|(field, value)| {
                validate_field(field, value, rules).map(|message| FieldError {
                    field: field.into(),
                    message,
                })
            })
            .collect(),
    }
}

static CONTACT_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    RuleSet::new()
        .rule(
            "name",
            FieldRules {
                required: true,
                min_length: Some(2),
                max_length: Some(50),
                pattern: Some(&NAME_PATTERN),
                ..Default::default()
            },
        )
        .rule(
            "email",
            FieldRules {
                required: true,
                pattern: Some(&EMAIL_PATTERN),
                ..Default::default()
            },
        )
        .rule(
            "subject",
            FieldRules {
                required: true,
                min_length: Some(5),
                max_length: Some(100),
                ..Default::default()
            },
        )
        .rule(
            "message",
            FieldRules {
                required: true,
                min_length: Some(10),
                max_length: Some(1000),
                ..Default::default()
            },
        )
});

/// The rule set for contact form submissions.
pub fn contact_rules() -> &'static RuleSet {
    &CONTACT_RULES
}
