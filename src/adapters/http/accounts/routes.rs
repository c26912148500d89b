//! HTTP routes for account endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{delete_own_account, login_access, register_account};
use crate::adapters::http::AppState;

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(register_account))
        .route("/accounts/me", delete(delete_own_account))
        .route("/accounts/:id/access", get(login_access))
}
