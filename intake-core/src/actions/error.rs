//! Error taxonomy shared by every account request action

use crate::models::MessageOutput;
use crate::store::StoreError;
use crate::validation::FieldValidationError;
use thiserror::Error;
use warp::http::StatusCode;

/// Terminal failure of an action. The display text is the user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// No credentials, or credentials nobody issued
    #[error("{0}")]
    Unauthorized(String),

    /// Known caller without the required capability
    #[error("{0}")]
    Forbidden(String),

    /// Malformed or missing request parameter
    #[error("{0}")]
    InvalidParameter(String),

    /// Missing mandatory field or field that fails validation
    #[error("{0}")]
    InvalidRequestBody(String),

    #[error("{0}")]
    NotFound(String),

    /// Well-formed request that is not allowed in the record's current state
    #[error("{0}")]
    InvalidOperation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl ActionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ActionError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ActionError::Forbidden(_) => StatusCode::FORBIDDEN,
            ActionError::InvalidParameter(_)
            | ActionError::InvalidRequestBody(_)
            | ActionError::InvalidOperation(_) => StatusCode::BAD_REQUEST,
            ActionError::NotFound(_) => StatusCode::NOT_FOUND,
            ActionError::Conflict(_) => StatusCode::CONFLICT,
            ActionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-readable kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ActionError::Unauthorized(_) => "unauthorized",
            ActionError::Forbidden(_) => "forbidden",
            ActionError::InvalidParameter(_) => "invalid_parameter",
            ActionError::InvalidRequestBody(_) => "invalid_request_body",
            ActionError::NotFound(_) => "not_found",
            ActionError::InvalidOperation(_) => "invalid_operation",
            ActionError::Conflict(_) => "conflict",
            ActionError::Internal(_) => "internal",
        }
    }

    pub fn to_output(&self) -> MessageOutput {
        MessageOutput::new(self.to_string())
    }
}

impl From<FieldValidationError> for ActionError {
    fn from(err: FieldValidationError) -> Self {
        ActionError::InvalidRequestBody(err.to_string())
    }
}

impl From<StoreError> for ActionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateRequest { .. } | StoreError::AlreadyExists(_) => {
                ActionError::Conflict(err.to_string())
            }
            StoreError::Backend(_) => ActionError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ActionError::InvalidParameter("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ActionError::InvalidRequestBody("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ActionError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ActionError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ActionError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ActionError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_store_errors_map_to_conflict_or_internal() {
        let duplicate = StoreError::DuplicateRequest {
            email: "a@b.com".into(),
            institute: "Uni".into(),
        };
        assert!(matches!(
            ActionError::from(duplicate),
            ActionError::Conflict(_)
        ));
        assert!(matches!(
            ActionError::from(StoreError::Backend("down".into())),
            ActionError::Internal(_)
        ));
    }

    #[test]
    fn test_output_carries_message() {
        let err = ActionError::NotFound("Account request with id = x not found".into());
        assert_eq!(err.to_output().message, "Account request with id = x not found");
    }
}
