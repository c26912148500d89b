//! HTTP adapter for the admin desk.

mod dto;
mod handlers;
mod routes;

pub use dto::{BanRequest, BanResponse, ResolveRequest, VerifyExpertRequest};
pub use routes::admin_routes;
