//! HTTP handlers for question endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::RequireActor;
use crate::application::handlers::{
    DeleteQuestionCommand, DeleteResponseCommand, GetQuestionThreadQuery, ListMyQuestionsQuery,
    RateAnswerCommand, ReplyToQuestionCommand, ReportContentCommand, ReportTarget,
    SubmitQuestionCommand,
};
use crate::application::Engine;
use crate::domain::foundation::{QuestionId, ResponseId};

use super::dto::{
    QuestionView, RateRequest, ReplyRequest, ReplyResponse, ReportRequest,
    SubmitQuestionRequest, SubmitQuestionResponse,
};

/// POST /api/questions - Ask a question
pub async fn submit_question(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
    Json(req): Json<SubmitQuestionRequest>,
) -> Result<Response, ApiError> {
    let cmd = SubmitQuestionCommand {
        actor,
        content: req.content,
        category: req.category,
        attachment: req.attachment,
    };

    let result = engine.submit_question.handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(SubmitQuestionResponse::from(result))).into_response())
}

/// GET /api/questions - The caller's questions (asked or assigned)
pub async fn list_my_questions(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
) -> Result<Json<Vec<QuestionView>>, ApiError> {
    let questions = engine
        .list_my_questions
        .handle(ListMyQuestionsQuery { actor })
        .await?;
    Ok(Json(questions.into_iter().map(Into::into).collect()))
}

/// GET /api/questions/:id - Question with its conversation and report
pub async fn get_thread(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
    Path(question_id): Path<String>,
) -> Result<Response, ApiError> {
    let question_id: QuestionId = parse_id(&question_id, "question")?;
    let thread = engine
        .question_thread
        .handle(GetQuestionThreadQuery { actor, question_id })
        .await?;
    Ok(Json(thread).into_response())
}

/// DELETE /api/questions/:id - Remove a question and its conversation
pub async fn delete_question(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
    Path(question_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let question_id: QuestionId = parse_id(&question_id, "question")?;
    engine
        .delete_question
        .handle(DeleteQuestionCommand { actor, question_id })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/questions/:id/responses - Reply in the conversation
pub async fn reply(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
    Path(question_id): Path<String>,
    Json(req): Json<ReplyRequest>,
) -> Result<Response, ApiError> {
    let question_id: QuestionId = parse_id(&question_id, "question")?;
    let cmd = ReplyToQuestionCommand {
        actor,
        question_id,
        content: req.content,
    };

    let result = engine.reply_to_question.handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(ReplyResponse::from(result))).into_response())
}

/// POST /api/questions/:id/report - Escalate a question to moderators
pub async fn report_question(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
    Path(question_id): Path<String>,
    body: Option<Json<ReportRequest>>,
) -> Result<Json<QuestionView>, ApiError> {
    let question_id: QuestionId = parse_id(&question_id, "question")?;
    let question = engine
        .report_content
        .handle(ReportContentCommand {
            actor,
            target: ReportTarget::Question(question_id),
            reason: body.and_then(|Json(req)| req.reason),
        })
        .await?;
    Ok(Json(question.into()))
}

/// POST /api/responses/:id/report - Escalate the question a reply belongs to
pub async fn report_response(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
    Path(response_id): Path<String>,
    body: Option<Json<ReportRequest>>,
) -> Result<Json<QuestionView>, ApiError> {
    let response_id: ResponseId = parse_id(&response_id, "response")?;
    let question = engine
        .report_content
        .handle(ReportContentCommand {
            actor,
            target: ReportTarget::Response(response_id),
            reason: body.and_then(|Json(req)| req.reason),
        })
        .await?;
    Ok(Json(question.into()))
}

/// DELETE /api/responses/:id - Delete one's own reply
pub async fn delete_response(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
    Path(response_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let response_id: ResponseId = parse_id(&response_id, "response")?;
    engine
        .delete_response
        .handle(DeleteResponseCommand { actor, response_id })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/questions/:id/rating - Rate an answered question
pub async fn rate_answer(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
    Path(question_id): Path<String>,
    Json(req): Json<RateRequest>,
) -> Result<Json<QuestionView>, ApiError> {
    let question_id: QuestionId = parse_id(&question_id, "question")?;
    let question = engine
        .rate_answer
        .handle(RateAnswerCommand {
            actor,
            question_id,
            rating: req.rating,
            feedback: req.feedback,
        })
        .await?;
    Ok(Json(question.into()))
}
