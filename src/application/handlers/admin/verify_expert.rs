//! VerifyExpertHandler - admin decision on an expert application.

use std::sync::Arc;

use crate::application::retry::retry_on_conflict;
use crate::application::{Actor, EngineError};
use crate::domain::account::{Account, ExpertDecision, Role};
use crate::domain::foundation::{AccountId, DomainError, ErrorCode};
use crate::ports::AccountRepository;

#[derive(Debug, Clone)]
pub struct VerifyExpertCommand {
    pub actor: Actor,
    pub expert_id: AccountId,
    pub decision: ExpertDecision,
}

pub struct VerifyExpertHandler {
    accounts: Arc<dyn AccountRepository>,
}

impl VerifyExpertHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    pub async fn handle(&self, cmd: VerifyExpertCommand) -> Result<Account, EngineError> {
        cmd.actor.require(Role::Admin)?;
        cmd.actor.load_account(self.accounts.as_ref()).await?;

        let accounts = self.accounts.as_ref();
        let expert_id = cmd.expert_id;
        let decision = &cmd.decision;
        let expert = retry_on_conflict("Account", || async move {
            let mut account = accounts.find_by_id(&expert_id).await?.ok_or_else(|| {
                DomainError::new(ErrorCode::AccountNotFound, format!("Account not found: {}", expert_id))
            })?;
            if account.expert_profile().is_none() {
                return Err(DomainError::new(
                    ErrorCode::ValidationFailed,
                    format!("Account {} is not an expert", expert_id),
                ));
            }
            account.review_application(decision.clone())?;
            accounts.update(&account).await?;
            Ok(account)
        })
        .await?;

        tracing::info!(
            expert_id = %expert_id,
            admin_id = %cmd.actor.account_id,
            status = expert.expert_profile().map(|p| p.status.as_str()).unwrap_or("none"),
            "expert application reviewed"
        );
        Ok(expert)
    }
}
