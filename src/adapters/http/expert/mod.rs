//! HTTP adapter for the expert desk.

mod dto;
mod handlers;
mod routes;

pub use dto::{OnlineStatusRequest, SessionReportRequest};
pub use routes::expert_routes;
