//! Field validation for account requests

pub mod field_validator;

pub use field_validator::{
    validate_account_request_fields, validate_email, validate_institute_name,
    validate_person_name, FieldValidationError,
};
