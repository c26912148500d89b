//! SetOnlineStatusHandler - expert presence toggle.

use std::sync::Arc;

use crate::application::retry::retry_on_conflict;
use crate::application::{Actor, EngineError, Notifier};
use crate::domain::account::{Account, Role};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::notification::Notification;
use crate::ports::AccountRepository;

#[derive(Debug, Clone)]
pub struct SetOnlineStatusCommand {
    pub actor: Actor,
    pub is_online: bool,
}

pub struct SetOnlineStatusHandler {
    accounts: Arc<dyn AccountRepository>,
    notifier: Notifier,
}

impl SetOnlineStatusHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>, notifier: Notifier) -> Self {
        Self { accounts, notifier }
    }

    /// Updates presence; announces only actual changes.
    pub async fn handle(&self, cmd: SetOnlineStatusCommand) -> Result<Account, EngineError> {
        cmd.actor.require(Role::Expert)?;
        cmd.actor.load_account(self.accounts.as_ref()).await?;

        let accounts = self.accounts.as_ref();
        let expert_id = cmd.actor.account_id;
        let is_online = cmd.is_online;
        let (account, changed) = retry_on_conflict("Account", || async move {
            let mut account = accounts.find_by_id(&expert_id).await?.ok_or_else(|| {
                DomainError::new(ErrorCode::AccountNotFound, format!("Account not found: {}", expert_id))
            })?;
            let changed = account.set_online(is_online)?;
            if changed {
                accounts.update(&account).await?;
            }
            Ok((account, changed))
        })
        .await?;

        if changed {
            tracing::info!(expert_id = %expert_id, is_online, "expert presence changed");
            self.notifier
                .notify(Notification::ExpertStatusChanged {
                    expert_id,
                    is_online,
                })
                .await;
        }
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::Harness;
    use crate::application::ErrorKind;
    use crate::domain::moderation::Category;

    #[tokio::test]
    async fn change_is_persisted_and_announced_once() {
        let h = Harness::new();
        let expert = h.expert(Category::Legal, false).await;
        let handler = SetOnlineStatusHandler::new(h.accounts.clone(), h.notifier());
        let cmd = SetOnlineStatusCommand {
            actor: Actor::expert(expert),
            is_online: true,
        };

        handler.handle(cmd.clone()).await.unwrap();
        handler.handle(cmd).await.unwrap();

        let stored = h.account(expert).await;
        assert!(stored.expert_profile().unwrap().is_online);
        assert_eq!(h.bus.names(), vec!["expert_status_changed"]);
    }

    #[tokio::test]
    async fn askers_have_no_presence() {
        let h = Harness::new();
        let asker = h.asker().await;
        let handler = SetOnlineStatusHandler::new(h.accounts.clone(), h.notifier());

        let err = handler
            .handle(SetOnlineStatusCommand {
                actor: Actor::asker(asker),
                is_online: true,
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Authorization);
    }
}
