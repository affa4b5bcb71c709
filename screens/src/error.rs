//! Error types for the storefront screens.
//!
//! Two classes exist. Contract violations ([`FormError`], [`OrderLineError`],
//! [`SubmitError`]) mean the caller dispatched something the screen never
//! allows. [`ServiceError`] is a collaborator failing; its message is shown to
//! the user as-is.

use thiserror::Error;

/// A form update or declaration broke the form's contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// The update names a field the form never declared
    #[error("field '{0}' is not declared by this form")]
    UnknownField(String),

    /// A form must declare at least one field
    #[error("a form must declare at least one field")]
    NoFields,
}

/// A cart line was requested before the line was configured
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderLineError {
    /// No variation option matching the current list is selected
    #[error("no variation is selected")]
    NoVariationSelected,
}

/// Credentials were requested while submission is not allowed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// At least one field is invalid
    #[error("the form is not valid")]
    FormInvalid,

    /// A previous submission has not answered yet
    #[error("a submission is already in flight")]
    AlreadySubmitting,
}

/// A collaborator (authentication, catalog, cart) failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The collaborator answered with a refusal meant for the user
    #[error("{0}")]
    Rejected(String),

    /// The collaborator could not be reached
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl ServiceError {
    /// The collaborator's own message, shown to the user verbatim
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(message) | Self::Unavailable(message) => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_message_is_verbatim() {
        let error = ServiceError::Rejected("EMAIL_EXISTS".to_string());
        assert_eq!(error.user_message(), "EMAIL_EXISTS");
    }

    #[test]
    fn unavailable_message_is_verbatim() {
        let error = ServiceError::Unavailable("network unreachable".to_string());
        assert_eq!(error.user_message(), "network unreachable");
        assert_eq!(error.to_string(), "service unavailable: network unreachable");
    }

    #[test]
    fn unknown_field_names_the_field() {
        let error = FormError::UnknownField("phone".to_string());
        assert!(error.to_string().contains("phone"));
    }
}
