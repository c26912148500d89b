//! Error taxonomy returned by every application handler.

use serde::Serialize;
use thiserror::Error;

use crate::domain::account::StrikeNotice;
use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Coarse error category used to render a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Authorization,
    NotFound,
    PolicyViolation,
    ServiceUnavailable,
    Conflict,
    Infrastructure,
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// Missing or malformed input. Nothing was written.
    #[error("{0}")]
    Validation(String),

    /// Role or ownership mismatch. Nothing was written.
    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    NotFound(String),

    /// Content judged unsafe. The strike has been recorded.
    #[error("{}", .0.warning_message())]
    PolicyViolation(StrikeNotice),

    /// Every classifier backend failed. Nothing was written; retry later.
    #[error("Content safety check unavailable: {0}")]
    ServiceUnavailable(String),

    /// The entity is in a state that forbids the operation.
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Infrastructure(DomainError),
}

impl EngineError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Authorization(message.into())
    }

    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{} not found: {}", entity, id))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Validation(_) => ErrorKind::Validation,
            EngineError::Authorization(_) => ErrorKind::Authorization,
            EngineError::NotFound(_) => ErrorKind::NotFound,
            EngineError::PolicyViolation(_) => ErrorKind::PolicyViolation,
            EngineError::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            EngineError::Conflict(_) => ErrorKind::Conflict,
            EngineError::Infrastructure(_) => ErrorKind::Infrastructure,
        }
    }

    /// Machine-readable code for clients.
    pub fn code(&self) -> String {
        match self {
            EngineError::Validation(_) => ErrorCode::ValidationFailed.to_string(),
            EngineError::Authorization(_) => ErrorCode::Forbidden.to_string(),
            EngineError::NotFound(_) => "NOT_FOUND".to_string(),
            EngineError::PolicyViolation(_) => ErrorCode::PolicyViolation.to_string(),
            EngineError::ServiceUnavailable(_) => ErrorCode::ClassifierUnavailable.to_string(),
            EngineError::Conflict(_) => "CONFLICT".to_string(),
            EngineError::Infrastructure(e) => e.code.to_string(),
        }
    }

    /// True when the same request may succeed later without changes.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::ServiceUnavailable(_))
    }

    pub fn strike_notice(&self) -> Option<&StrikeNotice> {
        match self {
            EngineError::PolicyViolation(notice) => Some(notice),
            _ => None,
        }
    }
}

impl From<DomainError> for EngineError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => EngineError::Validation(err.message),
            code if code.is_not_found() => EngineError::NotFound(err.message),
            ErrorCode::InvalidStateTransition
            | ErrorCode::AlreadyRated
            | ErrorCode::ReportAlreadyExists
            | ErrorCode::AlreadyExists
            | ErrorCode::ConcurrentModification => EngineError::Conflict(err.message),
            ErrorCode::Forbidden => EngineError::Authorization(err.message),
            ErrorCode::ClassifierUnavailable => EngineError::ServiceUnavailable(err.message),
            _ => EngineError::Infrastructure(err),
        }
    }
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Validation(err.to_string())
    }
}
