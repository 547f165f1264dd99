//! Pure status-transition planning
//!
//! Every function here takes the stored record and the requested change and
//! returns the record to persist plus the side effects to run after commit.
//! Nothing in this module touches storage or the network.

use super::params::require_field;
use super::ActionError;
use crate::models::{AccountRequest, AccountRequestStatus, AccountRequestUpdateRequest};
use crate::validation::{validate_account_request_fields, FieldValidationError};
use chrono::{DateTime, Utc};

/// Update payload whose mandatory fields are known to be present
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateFields {
    pub name: String,
    pub email: String,
    pub institute: String,
    pub status: AccountRequestStatus,
    pub comments: Option<String>,
}

impl UpdateFields {
    /// Reject the first null among name, email, institute and status
    pub fn from_request(request: AccountRequestUpdateRequest) -> Result<Self, ActionError> {
        Ok(Self {
            name: require_field(request.name, "name")?,
            email: require_field(request.email, "email")?,
            institute: require_field(request.institute, "institute")?,
            status: require_field(request.status, "status")?,
            comments: request.comments,
        })
    }

    pub fn validate(&self) -> Result<(), FieldValidationError> {
        validate_account_request_fields(&self.name, &self.email, &self.institute)
    }
}

/// Side effect to run once the new state is committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Tell the requester their account was approved and how to join
    NotifyApproval {
        recipient: String,
        name: String,
        registration_key: String,
    },
    /// Tell a previously registered requester to join again
    NotifyReset {
        recipient: String,
        name: String,
        registration_key: String,
    },
}

/// Outcome of planning: what to persist and what to do afterwards
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub record: AccountRequest,
    pub effects: Vec<Effect>,
}

/// Whether moving from `previous` to `requested` approves the request.
///
/// Registered requests can no longer be approved and an already approved
/// request is not approved a second time.
pub fn is_approving_transition(
    previous: AccountRequestStatus,
    requested: AccountRequestStatus,
) -> bool {
    requested == AccountRequestStatus::Approved
        && !matches!(
            previous,
            AccountRequestStatus::Registered | AccountRequestStatus::Approved
        )
}

/// Apply an update; registered requests stay registered whatever status was asked for
pub fn plan_update(previous: &AccountRequest, update: UpdateFields) -> Plan {
    let approving = is_approving_transition(previous.status, update.status);

    let status = if previous.is_registered() {
        AccountRequestStatus::Registered
    } else {
        update.status
    };

    let record = AccountRequest {
        name: update.name,
        email: update.email,
        institute: update.institute,
        status,
        comments: update.comments,
        ..previous.clone()
    };

    let effects = if approving {
        vec![Effect::NotifyApproval {
            recipient: record.email.clone(),
            name: record.name.clone(),
            registration_key: record.registration_key.clone(),
        }]
    } else {
        Vec::new()
    };

    Plan { record, effects }
}

/// Undo a registration so the instructor can join again
pub fn plan_reset(previous: &AccountRequest) -> Result<Plan, ActionError> {
    if !previous.is_registered() || previous.registered_at.is_none() {
        return Err(ActionError::InvalidOperation(
            "Unable to reset account request as instructor is still unregistered.".to_string(),
        ));
    }

    let record = AccountRequest {
        status: AccountRequestStatus::Approved,
        registered_at: None,
        ..previous.clone()
    };
    let effects = vec![Effect::NotifyReset {
        recipient: record.email.clone(),
        name: record.name.clone(),
        registration_key: record.registration_key.clone(),
    }];

    Ok(Plan { record, effects })
}

/// Mark an approved request as registered at `now`
pub fn plan_registration(
    previous: &AccountRequest,
    now: DateTime<Utc>,
) -> Result<Plan, ActionError> {
    match previous.status {
        AccountRequestStatus::Registered => Err(ActionError::InvalidOperation(
            "Account request has already been registered.".to_string(),
        )),
        AccountRequestStatus::Approved => Ok(Plan {
            record: AccountRequest {
                status: AccountRequestStatus::Registered,
                registered_at: Some(now),
                ..previous.clone()
            },
            effects: Vec::new(),
        }),
        AccountRequestStatus::Pending | AccountRequestStatus::Rejected => {
            Err(ActionError::InvalidOperation(
                "Account request has not been approved.".to_string(),
            ))
        }
    }
}
