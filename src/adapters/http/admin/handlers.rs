//! HTTP handlers for admin desk endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::adapters::http::accounts::AccountView;
use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::RequireActor;
use crate::adapters::http::questions::QuestionView;
use crate::application::handlers::{
    AdminQuery, BanAccountCommand, DashboardCounts, ResetViolationsCommand,
    ResolveFlaggedQuestionCommand, VerifyExpertCommand,
};
use crate::application::Engine;
use crate::domain::foundation::{AccountId, QuestionId};

use super::dto::{BanRequest, BanResponse, ResolveRequest, VerifyExpertRequest};

/// GET /api/admin/dashboard
pub async fn dashboard(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
) -> Result<Json<DashboardCounts>, ApiError> {
    let counts = engine.admin_queries.dashboard(AdminQuery { actor }).await?;
    Ok(Json(counts))
}

/// GET /api/admin/flagged-questions
pub async fn flagged_questions(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
) -> Result<Json<Vec<QuestionView>>, ApiError> {
    let questions = engine
        .admin_queries
        .flagged_questions(AdminQuery { actor })
        .await?;
    Ok(Json(questions.into_iter().map(QuestionView::from).collect()))
}

/// GET /api/admin/flagged-accounts
pub async fn flagged_accounts(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
) -> Result<Json<Vec<AccountView>>, ApiError> {
    let accounts = engine
        .admin_queries
        .flagged_accounts(AdminQuery { actor })
        .await?;
    Ok(Json(accounts.into_iter().map(AccountView::from).collect()))
}

/// GET /api/admin/pending-experts
pub async fn pending_experts(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
) -> Result<Json<Vec<AccountView>>, ApiError> {
    let accounts = engine
        .admin_queries
        .pending_experts(AdminQuery { actor })
        .await?;
    Ok(Json(accounts.into_iter().map(AccountView::from).collect()))
}

/// POST /api/admin/experts/:id/verify
pub async fn verify_expert(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
    Path(expert_id): Path<String>,
    Json(req): Json<VerifyExpertRequest>,
) -> Result<Json<AccountView>, ApiError> {
    let expert_id: AccountId = parse_id(&expert_id, "account")?;
    let account = engine
        .verify_expert
        .handle(VerifyExpertCommand {
            actor,
            expert_id,
            decision: req.into(),
        })
        .await?;
    Ok(Json(account.into()))
}

/// POST /api/admin/questions/:id/resolve
pub async fn resolve_question(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
    Path(question_id): Path<String>,
    Json(req): Json<ResolveRequest>,
) -> Result<Json<QuestionView>, ApiError> {
    let question_id: QuestionId = parse_id(&question_id, "question")?;
    let question = engine
        .resolve_flagged_question
        .handle(ResolveFlaggedQuestionCommand {
            actor,
            question_id,
            action: req.action,
        })
        .await?;
    Ok(Json(question.into()))
}

/// POST /api/admin/accounts/:id/reset-violations
pub async fn reset_violations(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
    Path(account_id): Path<String>,
) -> Result<Json<AccountView>, ApiError> {
    let account_id: AccountId = parse_id(&account_id, "account")?;
    let account = engine
        .reset_violations
        .handle(ResetViolationsCommand { actor, account_id })
        .await?;
    Ok(Json(account.into()))
}

/// POST /api/admin/accounts/:id/ban
pub async fn ban_account(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
    Path(account_id): Path<String>,
    Json(req): Json<BanRequest>,
) -> Result<Json<BanResponse>, ApiError> {
    let account_id: AccountId = parse_id(&account_id, "account")?;
    let result = engine
        .ban_account
        .handle(BanAccountCommand {
            actor,
            account_id,
            reason: req.reason,
        })
        .await?;
    Ok(Json(result.into()))
}
