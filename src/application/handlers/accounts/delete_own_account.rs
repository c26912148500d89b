//! DeleteOwnAccountHandler - self-service soft deletion.

use std::sync::Arc;

use crate::application::retry::retry_on_conflict;
use crate::application::{Actor, ContentCleanup, EngineError};
use crate::domain::account::{Account, Role};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::ports::AccountRepository;

#[derive(Debug, Clone)]
pub struct DeleteOwnAccountCommand {
    pub actor: Actor,
}

pub struct DeleteOwnAccountHandler {
    accounts: Arc<dyn AccountRepository>,
    cleanup: ContentCleanup,
}

impl DeleteOwnAccountHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>, cleanup: ContentCleanup) -> Self {
        Self { accounts, cleanup }
    }

    pub async fn handle(&self, cmd: DeleteOwnAccountCommand) -> Result<Account, EngineError> {
        // 1. Admins are managed out of band
        if cmd.actor.is_admin() {
            return Err(EngineError::forbidden("Admin accounts cannot be self-deleted"));
        }
        cmd.actor.load_account(self.accounts.as_ref()).await?;

        // 2. Soft delete; the flag history stays for audit
        let accounts = self.accounts.as_ref();
        let account_id = cmd.actor.account_id;
        let account = retry_on_conflict("Account", || async move {
            let mut account = accounts.find_by_id(&account_id).await?.ok_or_else(|| {
                DomainError::new(
                    ErrorCode::AccountNotFound,
                    format!("Account not found: {}", account_id),
                )
            })?;
            account.soft_delete(Timestamp::now());
            accounts.update(&account).await?;
            Ok(account)
        })
        .await?;

        // 3. Cascade
        match account.role() {
            Role::Asker => {
                let removed = self.cleanup.remove_asker_content(account_id).await?;
                tracing::info!(account_id = %account_id, questions_removed = removed, "asker deleted account");
            }
            Role::Expert => {
                let released = self.cleanup.release_expert_assignments(account_id).await?;
                tracing::info!(account_id = %account_id, assignments_released = released, "expert deleted account");
            }
            Role::Admin => {}
        }
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::Harness;
    use crate::application::ErrorKind;
    use crate::domain::account::AccessDecision;
    use crate::domain::moderation::Category;

    fn handler(h: &Harness) -> DeleteOwnAccountHandler {
        DeleteOwnAccountHandler::new(h.accounts.clone(), h.cleanup())
    }

    #[tokio::test]
    async fn asker_deletion_removes_questions() {
        let h = Harness::new();
        let asker = h.asker().await;
        h.question(asker, None).await;

        let account = handler(&h)
            .handle(DeleteOwnAccountCommand {
                actor: Actor::asker(asker),
            })
            .await
            .unwrap();

        assert!(account.is_deleted);
        assert!(h.questions.is_empty().await);
        assert_eq!(
            AccessDecision::evaluate(&h.account(asker).await),
            AccessDecision::SelfDeleted
        );
    }

    #[tokio::test]
    async fn expert_deletion_goes_offline_and_releases_questions() {
        let h = Harness::new();
        let expert = h.expert(Category::Career, true).await;
        let question = h.question(h.asker().await, Some(expert)).await;

        handler(&h)
            .handle(DeleteOwnAccountCommand {
                actor: Actor::expert(expert),
            })
            .await
            .unwrap();

        let stored = h.account(expert).await;
        assert!(!stored.expert_profile().unwrap().is_online);
        assert!(h.stored_question(question.id).await.unwrap().expert_id.is_none());
    }

    #[tokio::test]
    async fn admins_and_deleted_accounts_are_refused() {
        let h = Harness::new();
        let admin = h.admin().await;
        let asker = h.asker().await;
        let handler = handler(&h);

        let err = handler
            .handle(DeleteOwnAccountCommand {
                actor: Actor::admin(admin),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);

        let cmd = DeleteOwnAccountCommand {
            actor: Actor::asker(asker),
        };
        handler.handle(cmd.clone()).await.unwrap();
        let err = handler.handle(cmd).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }
}
