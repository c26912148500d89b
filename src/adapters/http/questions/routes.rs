//! HTTP routes for question endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{
    delete_question, delete_response, get_thread, list_my_questions, rate_answer, reply,
    report_question, report_response, submit_question,
};
use crate::adapters::http::AppState;

/// Question lifecycle routes, relative to `/api`.
pub fn question_routes() -> Router<AppState> {
    Router::new()
        .route("/questions", post(submit_question).get(list_my_questions))
        .route("/questions/:id", get(get_thread).delete(delete_question))
        .route("/questions/:id/responses", post(reply))
        .route("/questions/:id/report", post(report_question))
        .route("/questions/:id/rating", post(rate_answer))
        .route("/responses/:id", delete(delete_response))
        .route("/responses/:id/report", post(report_response))
}
