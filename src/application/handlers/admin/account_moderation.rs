//! Admin actions on accounts: violation reset and ban.

use std::sync::Arc;

use crate::application::{AccountLedger, Actor, ContentCleanup, EngineError};
use crate::domain::account::{Account, Role};
use crate::domain::foundation::{AccountId, ErrorCode};
use crate::ports::AccountRepository;

#[derive(Debug, Clone)]
pub struct ResetViolationsCommand {
    pub actor: Actor,
    pub account_id: AccountId,
}

pub struct ResetViolationsHandler {
    accounts: Arc<dyn AccountRepository>,
    strikes: Arc<AccountLedger>,
}

impl ResetViolationsHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>, strikes: Arc<AccountLedger>) -> Self {
        Self { accounts, strikes }
    }

    pub async fn handle(&self, cmd: ResetViolationsCommand) -> Result<Account, EngineError> {
        cmd.actor.require(Role::Admin)?;
        cmd.actor.load_account(self.accounts.as_ref()).await?;
        self.strikes.reset(cmd.account_id).await.map_err(|e| match e.code {
            ErrorCode::InvalidStateTransition => {
                EngineError::conflict("Violations of a deleted account cannot be reset")
            }
            _ => e.into(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct BanAccountCommand {
    pub actor: Actor,
    pub account_id: AccountId,
    pub reason: String,
}

/// Result of a ban, with the cascade it triggered.
#[derive(Debug, Clone)]
pub struct BanAccountResult {
    pub account: Account,
    pub questions_removed: usize,
    pub assignments_released: usize,
}

/// Terminal suspension. Askers lose their questions; experts are detached
/// from unanswered work.
pub struct BanAccountHandler {
    accounts: Arc<dyn AccountRepository>,
    strikes: Arc<AccountLedger>,
    cleanup: ContentCleanup,
}

impl BanAccountHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        strikes: Arc<AccountLedger>,
        cleanup: ContentCleanup,
    ) -> Self {
        Self {
            accounts,
            strikes,
            cleanup,
        }
    }

    pub async fn handle(&self, cmd: BanAccountCommand) -> Result<BanAccountResult, EngineError> {
        cmd.actor.require(Role::Admin)?;
        cmd.actor.load_account(self.accounts.as_ref()).await?;
        let reason = cmd.reason.trim();
        if reason.is_empty() {
            return Err(EngineError::validation("A ban reason is required"));
        }

        let target = self
            .accounts
            .find_by_id(&cmd.account_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Account", cmd.account_id))?;
        if target.role() == Role::Admin {
            return Err(EngineError::forbidden("Admin accounts cannot be banned"));
        }
        if target.is_deleted {
            return Err(EngineError::conflict("Account is already deleted"));
        }

        let account = self.strikes.ban(cmd.account_id, reason).await?;

        let mut result = BanAccountResult {
            account,
            questions_removed: 0,
            assignments_released: 0,
        };
        match result.account.role() {
            Role::Asker => {
                result.questions_removed =
                    self.cleanup.remove_asker_content(cmd.account_id).await?;
            }
            Role::Expert => {
                result.assignments_released =
                    self.cleanup.release_expert_assignments(cmd.account_id).await?;
            }
            Role::Admin => {}
        }
        Ok(result)
    }
}
