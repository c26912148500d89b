//! The authenticated caller of an operation.
//!
//! Identity verification happens upstream; handlers receive an account id
//! and role and check capabilities per operation.

use serde::{Deserialize, Serialize};

use crate::domain::account::{Account, Role};
use crate::domain::foundation::AccountId;
use crate::ports::AccountRepository;

use super::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub account_id: AccountId,
    pub role: Role,
}

impl Actor {
    pub fn new(account_id: AccountId, role: Role) -> Self {
        Self { account_id, role }
    }

    pub fn asker(account_id: AccountId) -> Self {
        Self::new(account_id, Role::Asker)
    }

    pub fn expert(account_id: AccountId) -> Self {
        Self::new(account_id, Role::Expert)
    }

    pub fn admin(account_id: AccountId) -> Self {
        Self::new(account_id, Role::Admin)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fails unless the actor holds `role`.
    pub fn require(&self, role: Role) -> Result<(), EngineError> {
        if self.role == role {
            Ok(())
        } else {
            Err(EngineError::forbidden(format!(
                "Only {} accounts can perform this action",
                role
            )))
        }
    }

    /// Loads the actor's account and checks it is live and matches the role.
    pub async fn load_account(
        &self,
        accounts: &dyn AccountRepository,
    ) -> Result<Account, EngineError> {
        let account = accounts
            .find_by_id(&self.account_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Account", self.account_id))?;

        if account.is_deleted {
            return Err(EngineError::forbidden("Account is no longer active"));
        }
        if account.role() != self.role {
            return Err(EngineError::forbidden("Account role does not match"));
        }
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryAccountRepository;
    use crate::application::ErrorKind;
    use crate::domain::foundation::Timestamp;

    #[test]
    fn require_checks_role() {
        let actor = Actor::expert(AccountId::new());
        assert!(actor.require(Role::Expert).is_ok());
        assert_eq!(
            actor.require(Role::Admin).unwrap_err().kind(),
            ErrorKind::Authorization
        );
    }

    #[tokio::test]
    async fn load_account_rejects_deleted_and_mismatched_accounts() {
        let repo = InMemoryAccountRepository::new();
        let mut deleted = Account::new_asker(AccountId::new(), "gone");
        deleted.soft_delete(Timestamp::now());
        let asker = Account::new_asker(AccountId::new(), "here");
        repo.save(&deleted).await.unwrap();
        repo.save(&asker).await.unwrap();

        let err = Actor::asker(deleted.id).load_account(&repo).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);

        let err = Actor::expert(asker.id).load_account(&repo).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);

        let err = Actor::asker(AccountId::new()).load_account(&repo).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        assert!(Actor::asker(asker.id).load_account(&repo).await.is_ok());
    }
}
