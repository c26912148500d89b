//! HTTP adapter for question endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{QuestionView, SubmitQuestionRequest, SubmitQuestionResponse};
pub use routes::question_routes;
