//! HTTP handlers for account endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::{OptionalActor, RequireActor};
use crate::application::handlers::{
    CheckLoginAccessQuery, DeleteOwnAccountCommand, LoginAccess, RegisterAccountCommand,
};
use crate::application::Engine;
use crate::domain::foundation::AccountId;

use super::dto::{AccountView, RegisterAccountRequest};

/// POST /api/accounts - Register an account (admins only via another admin)
pub async fn register_account(
    State(engine): State<Engine>,
    OptionalActor(created_by): OptionalActor,
    Json(req): Json<RegisterAccountRequest>,
) -> Result<Response, ApiError> {
    let cmd = RegisterAccountCommand {
        display_name: req.display_name,
        role: req.role,
        category: req.category,
        created_by,
    };

    let account = engine.register_account.handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(AccountView::from(account))).into_response())
}

/// DELETE /api/accounts/me - Self-service deletion
pub async fn delete_own_account(
    State(engine): State<Engine>,
    RequireActor(actor): RequireActor,
) -> Result<StatusCode, ApiError> {
    engine
        .delete_own_account
        .handle(DeleteOwnAccountCommand { actor })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/accounts/:id/access - Login gate consulted by the identity layer
pub async fn login_access(
    State(engine): State<Engine>,
    Path(account_id): Path<String>,
) -> Result<Json<LoginAccess>, ApiError> {
    let account_id: AccountId = parse_id(&account_id, "account")?;
    let access = engine
        .check_login_access
        .handle(CheckLoginAccessQuery { account_id })
        .await?;
    Ok(Json(access))
}
