//! In-memory account store, also serving as the expert directory.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::account::{Account, ExpertStatus, Role};
use crate::domain::foundation::{AccountId, DomainError, ErrorCode};
use crate::domain::routing::{newest_matching, ExpertCriteria};
use crate::ports::{AccountRepository, ExpertDirectory};

/// Accounts keyed by id.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts, deleted ones included.
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn save(&self, account: &Account) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.id) {
            return Err(DomainError::new(
                ErrorCode::AlreadyExists,
                format!("Account {} already exists", account.id),
            ));
        }
        accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn update(&self, account: &Account) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        let stored = accounts.get_mut(&account.id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::AccountNotFound,
                format!("Account not found: {}", account.id),
            )
        })?;
        if stored.version != account.version {
            return Err(DomainError::concurrent_modification("Account", account.id));
        }
        let mut next = account.clone();
        next.version += 1;
        *stored = next;
        Ok(())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        Ok(self.accounts.read().await.get(id).cloned())
    }

    async fn list_flagged(&self) -> Result<Vec<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        let mut flagged: Vec<Account> = accounts
            .values()
            .filter(|a| a.is_flagged() && !a.is_deleted)
            .cloned()
            .collect();
        flagged.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(flagged)
    }

    async fn list_pending_experts(&self) -> Result<Vec<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        let mut pending: Vec<Account> = accounts
            .values()
            .filter(|a| {
                !a.is_deleted
                    && a.expert_profile()
                        .is_some_and(|p| p.status == ExpertStatus::Pending)
            })
            .cloned()
            .collect();
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(pending)
    }

    async fn count_by_role(&self, role: Role) -> Result<u64, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .filter(|a| !a.is_deleted && a.role() == role)
            .count() as u64)
    }
}

#[async_trait]
impl ExpertDirectory for InMemoryAccountRepository {
    async fn find_newest_expert(
        &self,
        criteria: &ExpertCriteria,
    ) -> Result<Option<AccountId>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(newest_matching(accounts.values(), criteria).map(|a| a.id))
    }
}
