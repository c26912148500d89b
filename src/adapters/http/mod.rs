//! HTTP adapter - REST API and live notification feed.
//!
//! Each desk has its own module with DTOs, handlers and routes. All routes
//! share [`AppState`] and are mounted under `/api` by [`app_router`].

pub mod accounts;
pub mod admin;
pub mod error;
pub mod expert;
pub mod feed;
pub mod middleware;
pub mod questions;

use axum::{extract::FromRef, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::adapters::notifications::BroadcastNotificationBus;
use crate::application::Engine;

pub use error::{ApiError, ErrorResponse};

/// Shared state for every route.
#[derive(Clone)]
pub struct AppState {
    pub engine: Engine,
    pub feed: BroadcastNotificationBus,
}

impl AppState {
    pub fn new(engine: Engine, feed: BroadcastNotificationBus) -> Self {
        Self { engine, feed }
    }
}

impl FromRef<AppState> for Engine {
    fn from_ref(state: &AppState) -> Self {
        state.engine.clone()
    }
}

impl FromRef<AppState> for BroadcastNotificationBus {
    fn from_ref(state: &AppState) -> Self {
        state.feed.clone()
    }
}

/// Complete application router, without transport layers.
pub fn app_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(accounts::account_routes())
        .merge(questions::question_routes())
        .merge(expert::expert_routes())
        .merge(admin::admin_routes())
        .merge(feed::feed_routes());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
