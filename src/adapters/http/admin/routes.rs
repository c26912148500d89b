//! HTTP routes for admin desk endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    ban_account, dashboard, flagged_accounts, flagged_questions, pending_experts,
    reset_violations, resolve_question, verify_expert,
};
use crate::adapters::http::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/dashboard", get(dashboard))
        .route("/admin/flagged-questions", get(flagged_questions))
        .route("/admin/flagged-accounts", get(flagged_accounts))
        .route("/admin/pending-experts", get(pending_experts))
        .route("/admin/experts/:id/verify", post(verify_expert))
        .route("/admin/questions/:id/resolve", post(resolve_question))
        .route("/admin/accounts/:id/reset-violations", post(reset_violations))
        .route("/admin/accounts/:id/ban", post(ban_account))
}
