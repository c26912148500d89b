//! Error rendering shared by every endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::{EngineError, ErrorKind};

/// Standard error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Set when the same request may succeed later.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
}

/// Wraps an engine error so handlers can return `Result<_, ApiError>`.
#[derive(Debug)]
pub struct ApiError(pub EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Authorization => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::PolicyViolation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::ServiceUnavailable => StatusCode::FAILED_DEPENDENCY,
        ErrorKind::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(err.kind());

        let message = match &err {
            EngineError::Infrastructure(inner) => {
                tracing::error!(code = %inner.code, "request failed: {}", inner.message);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let details = err
            .strike_notice()
            .and_then(|notice| serde_json::to_value(notice).ok());

        let body = ErrorResponse {
            code: err.code(),
            message,
            details,
            retryable: err.is_retryable(),
        };
        (status, Json(body)).into_response()
    }
}

/// Parses a path id; a malformed id is a validation error.
pub fn parse_id<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, ApiError> {
    raw.parse::<T>()
        .map_err(|_| ApiError(EngineError::validation(format!("Invalid {} ID", what))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{Account, StrikeNotice};
    use crate::domain::foundation::{AccountId, DomainError, ErrorCode};
    use crate::domain::moderation::ViolationType;

    #[test]
    fn kinds_map_to_statuses() {
        assert_eq!(status_for(ErrorKind::Validation), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::Authorization), StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::Conflict), StatusCode::CONFLICT);
        assert_eq!(
            status_for(ErrorKind::PolicyViolation),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(ErrorKind::ServiceUnavailable),
            StatusCode::FAILED_DEPENDENCY
        );
    }

    #[test]
    fn policy_violation_renders_422() {
        let account = Account::new_asker(AccountId::new(), "anon");
        let notice = StrikeNotice::for_account(&account, ViolationType::Harassment, "insult");
        let response = ApiError(EngineError::PolicyViolation(notice)).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn malformed_ids_are_bad_requests() {
        let err = parse_id::<AccountId>("not-a-uuid", "account").unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn infrastructure_errors_are_500() {
        let err: EngineError = DomainError::new(ErrorCode::DatabaseError, "pool closed").into();
        let response = ApiError(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
