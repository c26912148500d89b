//! HTTP routes for expert desk endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    analytics, approve_session_report, create_session_report, draft_summary,
    get_session_report, set_online_status, suggest_answer,
};
use crate::adapters::http::AppState;

pub fn expert_routes() -> Router<AppState> {
    Router::new()
        .route("/expert/status", put(set_online_status))
        .route("/expert/analytics", get(analytics))
        .route("/expert/questions/:id/suggestion", get(suggest_answer))
        .route("/expert/questions/:id/summary-draft", get(draft_summary))
        .route(
            "/questions/:id/session-report",
            post(create_session_report).get(get_session_report),
        )
        .route(
            "/questions/:id/session-report/approve",
            post(approve_session_report),
        )
}
