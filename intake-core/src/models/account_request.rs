//! Account request data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Review status of an account request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AccountRequestStatus {
    #[serde(rename = "PENDING")]
    #[default]
    Pending,
    #[serde(rename = "APPROVED")]
    Approved,
    #[serde(rename = "REJECTED")]
    Rejected,
    #[serde(rename = "REGISTERED")]
    Registered,
}

impl fmt::Display for AccountRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            AccountRequestStatus::Pending => "PENDING",
            AccountRequestStatus::Approved => "APPROVED",
            AccountRequestStatus::Rejected => "REJECTED",
            AccountRequestStatus::Registered => "REGISTERED",
        };
        f.write_str(value)
    }
}

impl FromStr for AccountRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(AccountRequestStatus::Pending),
            "APPROVED" => Ok(AccountRequestStatus::Approved),
            "REJECTED" => Ok(AccountRequestStatus::Rejected),
            "REGISTERED" => Ok(AccountRequestStatus::Registered),
            other => Err(format!(
                "Unknown account request status '{}' (expected pending, approved, rejected or registered)",
                other
            )),
        }
    }
}

/// A request from a prospective instructor for an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRequest {
    /// Unique identifier, never reassigned
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub institute: String,
    pub comments: Option<String>,
    pub status: AccountRequestStatus,
    /// Secret the instructor presents when joining
    pub registration_key: String,
    pub created_at: DateTime<Utc>,
    /// Set only by the registration flow
    pub registered_at: Option<DateTime<Utc>>,
}

impl AccountRequest {
    /// Create a new pending account request with a fresh id and registration key
    pub fn new(name: String, email: String, institute: String, comments: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            institute,
            comments,
            status: AccountRequestStatus::Pending,
            registration_key: generate_registration_key(),
            created_at: Utc::now(),
            registered_at: None,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.status == AccountRequestStatus::Registered
    }

    /// Case-insensitive match against name, email and institute
    pub fn matches_search_key(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        [&self.name, &self.email, &self.institute]
            .iter()
            .any(|field| field.to_lowercase().contains(&key))
    }
}

fn generate_registration_key() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Body of PUT /webapi/account/request
///
/// Mandatory fields are optional here so that an explicit `null` can be told
/// apart from a content validation failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountRequestUpdateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub institute: Option<String>,
    pub status: Option<AccountRequestStatus>,
    pub comments: Option<String>,
}

impl AccountRequestUpdateRequest {
    pub fn new(
        name: Option<&str>,
        email: Option<&str>,
        institute: Option<&str>,
        status: Option<AccountRequestStatus>,
        comments: Option<&str>,
    ) -> Self {
        Self {
            name: name.map(str::to_string),
            email: email.map(str::to_string),
            institute: institute.map(str::to_string),
            status,
            comments: comments.map(str::to_string),
        }
    }
}

/// Body of POST /webapi/account/request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountRequestCreateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub institute: Option<String>,
    pub comments: Option<String>,
}

/// Account request as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequestData {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub institute: String,
    pub status: AccountRequestStatus,
    pub comments: Option<String>,
    pub registration_key: String,
    pub created_at: DateTime<Utc>,
    pub registered_at: Option<DateTime<Utc>>,
}

impl From<&AccountRequest> for AccountRequestData {
    fn from(request: &AccountRequest) -> Self {
        Self {
            id: request.id,
            name: request.name.clone(),
            email: request.email.clone(),
            institute: request.institute.clone(),
            status: request.status,
            comments: request.comments.clone(),
            registration_key: request.registration_key.clone(),
            created_at: request.created_at,
            registered_at: request.registered_at,
        }
    }
}

impl From<AccountRequest> for AccountRequestData {
    fn from(request: AccountRequest) -> Self {
        Self::from(&request)
    }
}

/// Search results for GET /webapi/search/accountrequests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequestsData {
    pub account_requests: Vec<AccountRequestData>,
}

/// Plain message body used for errors and acknowledgements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageOutput {
    pub message: String,
}

impl MessageOutput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
