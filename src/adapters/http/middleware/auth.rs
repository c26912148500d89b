//! Caller identity extractors for axum.
//!
//! Authentication is performed upstream (the identity gateway). Verified
//! requests arrive with two headers which these extractors turn into an
//! [`Actor`]:
//!
//! ```text
//! X-Account-Id:   <uuid>
//! X-Account-Role: asker | expert | admin
//! ```
//!
//! # Example
//!
//! ```ignore
//! async fn my_handler(RequireActor(actor): RequireActor) -> impl IntoResponse {
//!     format!("Hello, {}!", actor.account_id)
//! }
//! ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::application::Actor;
use crate::domain::account::Role;
use crate::domain::foundation::AccountId;

pub const ACCOUNT_ID_HEADER: &str = "x-account-id";
pub const ACCOUNT_ROLE_HEADER: &str = "x-account-role";

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|h| h.to_str().ok())
}

fn actor_from_parts(parts: &Parts) -> Result<Option<Actor>, AuthRejection> {
    let (id, role) = match (header(parts, ACCOUNT_ID_HEADER), header(parts, ACCOUNT_ROLE_HEADER)) {
        (None, None) => return Ok(None),
        (Some(id), Some(role)) => (id, role),
        _ => return Err(AuthRejection::Malformed),
    };
    let account_id: AccountId = id.trim().parse().map_err(|_| AuthRejection::Malformed)?;
    let role: Role = role.trim().parse().map_err(|_| AuthRejection::Malformed)?;
    Ok(Some(Actor::new(account_id, role)))
}

/// Extractor that requires an identified caller.
#[derive(Debug, Clone, Copy)]
pub struct RequireActor(pub Actor);

#[async_trait]
impl<S> FromRequestParts<S> for RequireActor
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        actor_from_parts(parts)?
            .map(RequireActor)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

/// Extractor for routes that serve anonymous callers too.
#[derive(Debug, Clone, Copy)]
pub struct OptionalActor(pub Option<Actor>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalActor
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        actor_from_parts(parts).map(OptionalActor)
    }
}

/// Rejection type for identity failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    /// No identity headers were provided.
    Unauthenticated,
    /// Headers present but unparseable, or only one of them set.
    Malformed,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthRejection::Unauthenticated => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AuthRejection::Malformed => (StatusCode::UNAUTHORIZED, "Invalid identity headers"),
        };

        (
            status,
            Json(serde_json::json!({
                "error": message,
                "code": "UNAUTHENTICATED"
            })),
        )
            .into_response()
    }
}
