//! Persistent strike bookkeeping.
//!
//! Wraps [`FlagLedger`] with the account repository so every strike, reset
//! and ban is a retried compare-and-set write. Concurrent strikes on one
//! account are never lost.

use std::sync::Arc;

use crate::domain::account::{Account, FlagKind, FlagLedger, StrikeNotice};
use crate::domain::foundation::{AccountId, DomainError, ErrorCode};
use crate::domain::moderation::Verdict;
use crate::ports::AccountRepository;

use super::retry::retry_on_conflict;

pub struct AccountLedger {
    accounts: Arc<dyn AccountRepository>,
    ledger: FlagLedger,
}

impl AccountLedger {
    pub fn new(accounts: Arc<dyn AccountRepository>, ledger: FlagLedger) -> Self {
        Self { accounts, ledger }
    }

    async fn load(&self, id: AccountId) -> Result<Account, DomainError> {
        self.accounts.find_by_id(&id).await?.ok_or_else(|| {
            DomainError::new(ErrorCode::AccountNotFound, format!("Account not found: {}", id))
        })
    }

    /// Records one strike for an unsafe verdict on `content`.
    pub async fn record_strike(
        &self,
        account_id: AccountId,
        verdict: &Verdict,
        content: &str,
    ) -> Result<StrikeNotice, DomainError> {
        let kind = FlagKind::from(verdict.violation_type);
        let account = retry_on_conflict("Account", || async move {
            let account = self.load(account_id).await?;
            let account = self
                .ledger
                .record_violation(account, kind, &verdict.reason, content);
            self.accounts.update(&account).await?;
            Ok(account)
        })
        .await?;

        tracing::warn!(
            account_id = %account_id,
            violation = verdict.violation_type.as_str(),
            flag_count = account.flag_count(),
            is_flagged = account.is_flagged(),
            "strike recorded"
        );

        Ok(StrikeNotice::for_account(
            &account,
            verdict.violation_type,
            &verdict.reason,
        ))
    }

    /// Clears an account's whole violation history.
    ///
    /// Deleted accounts keep their history: a ban is only told apart from
    /// self-deletion by its record.
    pub async fn reset(&self, account_id: AccountId) -> Result<Account, DomainError> {
        let account = retry_on_conflict("Account", || async move {
            let account = self.load(account_id).await?;
            if account.is_deleted {
                return Err(DomainError::new(
                    ErrorCode::InvalidStateTransition,
                    format!("Account {} is deleted", account_id),
                ));
            }
            let account = self.ledger.reset_violations(account);
            self.accounts.update(&account).await?;
            Ok(account)
        })
        .await?;

        tracing::info!(account_id = %account_id, "violations reset");
        Ok(account)
    }

    /// Bans an account: admin_ban record plus soft delete.
    pub async fn ban(&self, account_id: AccountId, reason: &str) -> Result<Account, DomainError> {
        let account = retry_on_conflict("Account", || async move {
            let account = self.ledger.ban_account(self.load(account_id).await?, reason);
            self.accounts.update(&account).await?;
            Ok(account)
        })
        .await?;

        tracing::warn!(account_id = %account_id, role = %account.role(), "account banned");
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryAccountRepository;
    use crate::domain::moderation::{Category, ViolationType};

    async fn setup() -> (Arc<InMemoryAccountRepository>, AccountLedger, AccountId) {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let asker = Account::new_asker(AccountId::new(), "anon");
        repo.save(&asker).await.unwrap();
        let ledger = AccountLedger::new(repo.clone(), FlagLedger::default());
        (repo, ledger, asker.id)
    }

    fn spam() -> Verdict {
        Verdict::unsafe_content(ViolationType::Spam, Category::General, "advertising")
    }

    #[tokio::test]
    async fn strike_is_persisted_and_reported() {
        let (repo, ledger, id) = setup().await;

        let notice = ledger.record_strike(id, &spam(), "buy cheap pills").await.unwrap();

        assert_eq!(notice.flag_count, 1);
        assert!(!notice.is_flagged);
        assert_eq!(notice.violation_type, ViolationType::Spam);
        let stored = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.flag_count(), 1);
        assert_eq!(stored.flag_reasons()[0].excerpt, "buy cheap pills");
    }

    #[tokio::test]
    async fn concurrent_strikes_are_all_counted() {
        let (repo, ledger, id) = setup().await;
        let ledger = Arc::new(ledger);
        let verdict = spam();

        let (a, b) = tokio::join!(
            ledger.record_strike(id, &verdict, "one"),
            ledger.record_strike(id, &verdict, "two"),
        );
        a.unwrap();
        b.unwrap();

        let stored = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.flag_count(), 2);
        assert_eq!(stored.flag_reasons().len(), 2);
    }

    #[tokio::test]
    async fn reset_and_ban_are_persisted() {
        let (repo, ledger, id) = setup().await;
        for _ in 0..3 {
            ledger.record_strike(id, &spam(), "x").await.unwrap();
        }
        assert!(repo.find_by_id(&id).await.unwrap().unwrap().is_flagged());

        ledger.reset(id).await.unwrap();
        let stored = repo.find_by_id(&id).await.unwrap().unwrap();
        assert!(!stored.is_flagged());
        assert!(stored.flag_reasons().is_empty());

        ledger.ban(id, "abuse").await.unwrap();
        let stored = repo.find_by_id(&id).await.unwrap().unwrap();
        assert!(stored.is_deleted);
        assert!(stored.was_banned_by_admin());

        let err = ledger.reset(id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert!(repo.find_by_id(&id).await.unwrap().unwrap().was_banned_by_admin());
    }

    #[tokio::test]
    async fn unknown_account_is_not_found() {
        let (_repo, ledger, _) = setup().await;
        let err = ledger.reset(AccountId::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountNotFound);
    }
}
