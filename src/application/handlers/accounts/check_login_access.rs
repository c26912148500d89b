//! CheckLoginAccessHandler - decides whether an account may sign in.

use std::sync::Arc;

use serde::Serialize;

use crate::application::EngineError;
use crate::domain::account::{AccessDecision, Role};
use crate::domain::foundation::AccountId;
use crate::ports::AccountRepository;

#[derive(Debug, Clone)]
pub struct CheckLoginAccessQuery {
    pub account_id: AccountId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginAccess {
    pub account_id: AccountId,
    pub role: Role,
    pub decision: AccessDecision,
    pub allowed: bool,
    pub message: Option<String>,
}

pub struct CheckLoginAccessHandler {
    accounts: Arc<dyn AccountRepository>,
}

impl CheckLoginAccessHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    pub async fn handle(&self, query: CheckLoginAccessQuery) -> Result<LoginAccess, EngineError> {
        let account = self
            .accounts
            .find_by_id(&query.account_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Account", query.account_id))?;

        let decision = AccessDecision::evaluate(&account);
        if !decision.is_allowed() {
            tracing::info!(account_id = %account.id, decision = ?decision, "login refused");
        }
        Ok(LoginAccess {
            account_id: account.id,
            role: account.role(),
            allowed: decision.is_allowed(),
            message: decision.message(),
            decision,
        })
    }
}
