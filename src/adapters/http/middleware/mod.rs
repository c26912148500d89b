//! HTTP middleware for axum.
//!
//! - `auth` - Caller identity extractors

pub mod auth;

pub use auth::{AuthRejection, OptionalActor, RequireActor, ACCOUNT_ID_HEADER, ACCOUNT_ROLE_HEADER};
