//! HTTP adapter for account endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{AccountView, ExpertView, RegisterAccountRequest};
pub use routes::account_routes;
