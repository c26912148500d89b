//! Entity loading shared by handlers.

use crate::domain::foundation::{DomainError, ErrorCode, QuestionId, ResponseId};
use crate::domain::question::{Question, Response};
use crate::ports::{QuestionRepository, ResponseRepository};

pub(crate) async fn load_question(
    questions: &dyn QuestionRepository,
    id: QuestionId,
) -> Result<Question, DomainError> {
    questions.find_by_id(&id).await?.ok_or_else(|| {
        DomainError::new(ErrorCode::QuestionNotFound, format!("Question not found: {}", id))
    })
}

pub(crate) async fn load_response(
    responses: &dyn ResponseRepository,
    id: ResponseId,
) -> Result<Response, DomainError> {
    responses.find_by_id(&id).await?.ok_or_else(|| {
        DomainError::new(ErrorCode::ResponseNotFound, format!("Response not found: {}", id))
    })
}

pub(crate) fn forbidden(message: &str) -> DomainError {
    DomainError::new(ErrorCode::Forbidden, message)
}
