//! HTTP handlers for expert desk endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::accounts::AccountView;
use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::RequireActor;
use crate::application::handlers::{
    ApproveSessionReportCommand, AssistText, CreateSessionReportCommand,
    DraftSessionSummaryQuery, ExpertAnalytics, ExpertAnalyticsQuery, GetSessionReportQuery,
    SetOnlineStatusCommand, SuggestAnswerQuery,
};
use crate::application::Engine;
use crate::domain::foundation::QuestionId;
use crate::domain::question::SessionReport;

use super::dto::{OnlineStatusRequest, SessionReportRequest};

/// PUT /api/expert/status - Go online or offline
pub async fn set_online_status(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
    Json(req): Json<OnlineStatusRequest>,
) -> Result<Json<AccountView>, ApiError> {
    let account = engine
        .set_online_status
        .handle(SetOnlineStatusCommand {
            actor,
            is_online: req.is_online,
        })
        .await?;
    Ok(Json(account.into()))
}

/// GET /api/expert/analytics - Answer counts and ratings
pub async fn analytics(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
) -> Result<Json<ExpertAnalytics>, ApiError> {
    let analytics = engine
        .expert_analytics
        .handle(ExpertAnalyticsQuery { actor })
        .await?;
    Ok(Json(analytics))
}

/// GET /api/expert/questions/:id/suggestion - Drafting hint for the assigned expert
pub async fn suggest_answer(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
    Path(question_id): Path<String>,
) -> Result<Json<AssistText>, ApiError> {
    let question_id: QuestionId = parse_id(&question_id, "question")?;
    let text = engine
        .suggest_answer
        .handle(SuggestAnswerQuery { actor, question_id })
        .await?;
    Ok(Json(text))
}

/// GET /api/expert/questions/:id/summary-draft - Generated session summary
pub async fn draft_summary(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
    Path(question_id): Path<String>,
) -> Result<Json<AssistText>, ApiError> {
    let question_id: QuestionId = parse_id(&question_id, "question")?;
    let text = engine
        .draft_session_summary
        .handle(DraftSessionSummaryQuery { actor, question_id })
        .await?;
    Ok(Json(text))
}

/// POST /api/questions/:id/session-report - Snapshot the conversation
pub async fn create_session_report(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
    Path(question_id): Path<String>,
    Json(req): Json<SessionReportRequest>,
) -> Result<Response, ApiError> {
    let question_id: QuestionId = parse_id(&question_id, "question")?;
    let report = engine
        .create_session_report
        .handle(CreateSessionReportCommand {
            actor,
            question_id,
            summary: req.summary,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(report)).into_response())
}

/// POST /api/questions/:id/session-report/approve - Finalize the draft
pub async fn approve_session_report(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
    Path(question_id): Path<String>,
) -> Result<Json<SessionReport>, ApiError> {
    let question_id: QuestionId = parse_id(&question_id, "question")?;
    let report = engine
        .approve_session_report
        .handle(ApproveSessionReportCommand { actor, question_id })
        .await?;
    Ok(Json(report))
}

/// GET /api/questions/:id/session-report - Participants and admins
pub async fn get_session_report(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
    Path(question_id): Path<String>,
) -> Result<Json<SessionReport>, ApiError> {
    let question_id: QuestionId = parse_id(&question_id, "question")?;
    let report = engine
        .session_report
        .handle(GetSessionReportQuery { actor, question_id })
        .await?;
    Ok(Json(report))
}
