//! Account repository port.
//!
//! Accounts are only soft-deleted, so there is no delete operation.
//!
//! # Concurrency
//!
//! `update` is a compare-and-set on `Account::version`: it succeeds only if
//! the stored version equals the version the caller read, and stores the
//! account with `version + 1`. Otherwise it fails with
//! `ConcurrentModification` and the caller re-reads.

use async_trait::async_trait;

use crate::domain::account::{Account, Role};
use crate::domain::foundation::{AccountId, DomainError};

/// Repository port for Account aggregate persistence.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Save a new account.
    async fn save(&self, account: &Account) -> Result<(), DomainError>;

    /// Conditionally update an existing account.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if the account doesn't exist
    /// - `ConcurrentModification` if the stored version differs
    async fn update(&self, account: &Account) -> Result<(), DomainError>;

    /// Find an account by id, including soft-deleted ones.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError>;

    /// Accounts at or above the strike threshold that are not deleted.
    async fn list_flagged(&self) -> Result<Vec<Account>, DomainError>;

    /// Non-deleted experts whose application is pending, oldest first.
    async fn list_pending_experts(&self) -> Result<Vec<Account>, DomainError>;

    /// Number of non-deleted accounts with the given role.
    async fn count_by_role(&self, role: Role) -> Result<u64, DomainError>;
}
