use portfolio_models::contact::{ContactMessage, ContactMessageAuthor};
use portfolio_validation::{validate_form, FieldError, RuleSet, ValidationReport};
use serde::Deserialize;

/// Raw request payload. Fields default to empty strings so that a missing
/// field fails the `required` rule instead of aborting deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiContactMessage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl ApiContactMessage {
    pub fn validate(&self, rules: &RuleSet) -> ValidationReport {
        validate_form(
            [
                ("name", self.name.as_str()),
                ("email", self.email.as_str()),
                ("subject", self.subject.as_str()),
                ("message", self.message.as_str()),
            ],
            rules,
        )
    }
}

impl TryFrom<ApiContactMessage> for ContactMessage {
    type Error = FieldError;

    fn try_from(value: ApiContactMessage) -> Result<Self, Self::Error> {
        Ok(Self {
            author: ContactMessageAuthor {
                name: value.name.try_into().map_err(|_| invalid("name"))?,
                email: value.email.parse().map_err(|_| invalid("email"))?,
            },
            subject: value.subject.try_into().map_err(|_| invalid("subject"))?,
            content: value.message.try_into().map_err(|_| invalid("message"))?,
        })
    }
}

fn invalid(field: &str) -> FieldError {
    FieldError {
        field: field.into(),
        message: "Invalid format".into(),
    }
}
