//! Request parameter and body parsing

use super::ActionError;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use uuid::Uuid;

pub const ACCOUNT_REQUEST_ID: &str = "id";
pub const SEARCH_KEY: &str = "searchkey";
pub const REGISTRATION_KEY: &str = "key";

/// Look up a query parameter that must be present
pub fn required_param<'a>(
    params: &'a HashMap<String, String>,
    name: &str,
) -> Result<&'a str, ActionError> {
    params
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| missing_param(name))
}

pub fn missing_param(name: &str) -> ActionError {
    ActionError::InvalidParameter(format!("The [{}] HTTP parameter is null.", name))
}

/// Parse a record id in the hyphenated 8-4-4-4-12 form, echoing the raw value on failure
pub fn parse_uuid(raw: &str) -> Result<Uuid, ActionError> {
    let invalid = || ActionError::InvalidParameter(format!("Invalid UUID string: {}", raw));
    let id = Uuid::parse_str(raw).map_err(|_| invalid())?;
    // parse_str also takes braced, urn and unhyphenated forms
    if raw.len() != uuid::fmt::Hyphenated::LENGTH
        || !id.hyphenated().to_string().eq_ignore_ascii_case(raw)
    {
        return Err(invalid());
    }
    Ok(id)
}

/// Deserialize a JSON request body
pub fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ActionError> {
    serde_json::from_slice(body)
        .map_err(|e| ActionError::InvalidRequestBody(format!("Invalid request body: {}", e)))
}

/// Unwrap a mandatory body field
pub fn require_field<T>(value: Option<T>, field: &str) -> Result<T, ActionError> {
    value.ok_or_else(|| ActionError::InvalidRequestBody(format!("{} cannot be null", field)))
}
