//! Field validation for account request attributes
//!
//! Every failure renders to a fixed, user-facing message. Callers and tests
//! rely on the exact text, so the templates below are part of the API.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

pub const EMAIL_FIELD_NAME: &str = "email";
pub const EMAIL_MAX_LENGTH: usize = 254;

pub const PERSON_NAME_FIELD_NAME: &str = "person name";
pub const PERSON_NAME_MAX_LENGTH: usize = 100;

pub const INSTITUTE_NAME_FIELD_NAME: &str = "institute name";
pub const INSTITUTE_NAME_MAX_LENGTH: usize = 128;

pub const REASON_EMPTY: &str = "is empty";
pub const REASON_TOO_LONG: &str = "is too long";
pub const REASON_INCORRECT_FORMAT: &str = "is not in the correct format";
pub const REASON_START_WITH_NON_ALPHANUMERIC_CHAR: &str =
    "starts with a non-alphanumeric character";
pub const REASON_CONTAINS_INVALID_CHAR: &str = "contains invalid characters";

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[\w+-][\w+!#$%&'*/=?^_`{}~-]*(\.[\w+!#$%&'*/=?^_`{}~-]+)*@([A-Za-z0-9-]+\.)*[A-Za-z]+$",
    )
    .expect("email pattern is a valid regex")
});

/// A single field that failed validation, rendered with its populated message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldValidationError {
    #[error("\"{value}\" is not acceptable to Intake as a/an {field} because it {reason}. An email address contains some text followed by one '@' sign followed by some more text, and should end with a top level domain address like .com. It cannot be longer than {max_length} characters, cannot be empty and cannot contain spaces.")]
    Email {
        value: String,
        field: &'static str,
        reason: &'static str,
        max_length: usize,
    },

    #[error("\"{value}\" is not acceptable to Intake as a/an {field} because it {reason}. All {field} must start with an alphanumeric character, and cannot contain any vertical bar (|) or percent sign (%).")]
    InvalidName {
        value: String,
        field: &'static str,
        reason: &'static str,
    },

    #[error("\"{value}\" is not acceptable to Intake as a/an {field} because it {reason}. The value of a/an {field} should be no longer than {max_length} characters. It should not be empty.")]
    SizeCappedNonEmptyString {
        value: String,
        field: &'static str,
        reason: &'static str,
        max_length: usize,
    },

    #[error("The provided {field} is not acceptable to Intake as it contains only whitespace or contains extra spaces at the beginning or at the end of the text.")]
    Whitespace { field: &'static str },
}

impl FieldValidationError {
    /// Name of the field that failed
    pub fn field(&self) -> &'static str {
        match self {
            FieldValidationError::Email { field, .. }
            | FieldValidationError::InvalidName { field, .. }
            | FieldValidationError::SizeCappedNonEmptyString { field, .. }
            | FieldValidationError::Whitespace { field } => field,
        }
    }
}

fn is_untrimmed(value: &str) -> bool {
    value.trim() != value
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), FieldValidationError> {
    let email_error = |reason| FieldValidationError::Email {
        value: email.to_string(),
        field: EMAIL_FIELD_NAME,
        reason,
        max_length: EMAIL_MAX_LENGTH,
    };

    if email.is_empty() {
        return Err(email_error(REASON_EMPTY));
    }

    if is_untrimmed(email) {
        return Err(FieldValidationError::Whitespace {
            field: EMAIL_FIELD_NAME,
        });
    }

    if email.chars().count() > EMAIL_MAX_LENGTH {
        return Err(email_error(REASON_TOO_LONG));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(email_error(REASON_INCORRECT_FORMAT));
    }

    Ok(())
}

/// Validate a person's name
pub fn validate_person_name(name: &str) -> Result<(), FieldValidationError> {
    validate_allowed_name(name, PERSON_NAME_FIELD_NAME, PERSON_NAME_MAX_LENGTH)
}

/// Validate an institute name
pub fn validate_institute_name(institute: &str) -> Result<(), FieldValidationError> {
    validate_allowed_name(institute, INSTITUTE_NAME_FIELD_NAME, INSTITUTE_NAME_MAX_LENGTH)
}

fn validate_allowed_name(
    value: &str,
    field: &'static str,
    max_length: usize,
) -> Result<(), FieldValidationError> {
    let size_error = |reason| FieldValidationError::SizeCappedNonEmptyString {
        value: value.to_string(),
        field,
        reason,
        max_length,
    };
    let name_error = |reason| FieldValidationError::InvalidName {
        value: value.to_string(),
        field,
        reason,
    };

    if value.is_empty() {
        return Err(size_error(REASON_EMPTY));
    }

    if is_untrimmed(value) {
        return Err(FieldValidationError::Whitespace { field });
    }

    if value.chars().count() > max_length {
        return Err(size_error(REASON_TOO_LONG));
    }

    // Non-empty after the checks above
    let first_char = value.chars().next().unwrap_or_default();
    if !first_char.is_alphanumeric() {
        return Err(name_error(REASON_START_WITH_NON_ALPHANUMERIC_CHAR));
    }

    if value.contains('|') || value.contains('%') {
        return Err(name_error(REASON_CONTAINS_INVALID_CHAR));
    }

    Ok(())
}

/// Validate the editable attributes of an account request, stopping at the first failure
pub fn validate_account_request_fields(
    name: &str,
    email: &str,
    institute: &str,
) -> Result<(), FieldValidationError> {
    validate_person_name(name)?;
    validate_email(email)?;
    validate_institute_name(institute)?;
    Ok(())
}
