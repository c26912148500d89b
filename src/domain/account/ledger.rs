//! Per-account violation ledger.
//!
//! Every mutation of the strike history goes through [`FlagLedger`], which
//! keeps `flag_count` and `flag_reasons` moving together.

use serde::Serialize;

use crate::domain::foundation::{AccountId, QuestionId, Timestamp};
use crate::domain::moderation::ViolationType;

use super::flag::excerpt;
use super::{Account, FlagKind, FlagRecord};

/// Number of strikes at which an account is flagged for review.
pub const FLAG_THRESHOLD: u32 = 3;

/// Default number of characters of offending content kept in a record.
pub const DEFAULT_EXCERPT_CHARS: usize = 100;

/// Applies strike, reset and ban operations to accounts.
#[derive(Debug, Clone, Copy)]
pub struct FlagLedger {
    excerpt_chars: usize,
}

impl Default for FlagLedger {
    fn default() -> Self {
        Self::new(DEFAULT_EXCERPT_CHARS)
    }
}

impl FlagLedger {
    pub fn new(excerpt_chars: usize) -> Self {
        Self { excerpt_chars }
    }

    /// Appends one strike and returns the updated account.
    pub fn record_violation(
        &self,
        mut account: Account,
        kind: FlagKind,
        reason: &str,
        content: &str,
    ) -> Account {
        let now = Timestamp::now();
        account.flag_reasons.push(FlagRecord::new(
            kind,
            reason,
            excerpt(content, self.excerpt_chars),
            now,
        ));
        account.flag_count += 1;
        account.updated_at = now;
        account
    }

    /// Clears the whole violation history. Idempotent.
    pub fn reset_violations(&self, mut account: Account) -> Account {
        if account.flag_count == 0 && account.flag_reasons.is_empty() {
            return account;
        }
        account.flag_count = 0;
        account.flag_reasons.clear();
        account.updated_at = Timestamp::now();
        account
    }

    /// Appends an `admin_ban` record and soft-deletes the account.
    pub fn ban_account(&self, mut account: Account, reason: &str) -> Account {
        let now = Timestamp::now();
        account
            .flag_reasons
            .push(FlagRecord::new(FlagKind::AdminBan, reason, "", now));
        account.flag_count += 1;
        account.soft_delete(now);
        account.updated_at = now;
        account
    }
}

/// What the offending account is told after a strike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrikeNotice {
    pub account_id: AccountId,
    pub flag_count: u32,
    pub is_flagged: bool,
    pub violation_type: ViolationType,
    pub reason: String,
    /// Question parked for review when the strike came from a submission.
    pub quarantined_question: Option<QuestionId>,
}

impl StrikeNotice {
    pub fn for_account(account: &Account, violation_type: ViolationType, reason: &str) -> Self {
        Self {
            account_id: account.id,
            flag_count: account.flag_count(),
            is_flagged: account.is_flagged(),
            violation_type,
            reason: reason.to_string(),
            quarantined_question: None,
        }
    }

    pub fn with_question(mut self, question_id: QuestionId) -> Self {
        self.quarantined_question = Some(question_id);
        self
    }

    /// User-facing warning text.
    pub fn warning_message(&self) -> String {
        if self.is_flagged {
            "Your account has been flagged for review due to multiple violations.".to_string()
        } else {
            format!(
                "Warning {}/{}: Further violations may result in account suspension.",
                self.flag_count, FLAG_THRESHOLD
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::moderation::Category;
    use proptest::prelude::*;

    fn asker() -> Account {
        Account::new_asker(AccountId::new(), "anon")
    }

    #[test]
    fn record_violation_appends_and_counts() {
        let ledger = FlagLedger::default();
        let account = ledger.record_violation(asker(), FlagKind::Spam, "ads", "buy now");

        assert_eq!(account.flag_count(), 1);
        assert_eq!(account.flag_reasons().len(), 1);
        assert_eq!(account.flag_reasons()[0].kind, FlagKind::Spam);
        assert_eq!(account.flag_reasons()[0].excerpt, "buy now");
        assert!(!account.is_flagged());
    }

    #[test]
    fn third_strike_flags_account() {
        let ledger = FlagLedger::default();
        let mut account = asker();
        for _ in 0..3 {
            account = ledger.record_violation(account, FlagKind::Harassment, "insult", "you idiot");
        }
        assert_eq!(account.flag_count(), 3);
        assert!(account.is_flagged());
        assert!(account.is_active());
    }

    #[test]
    fn excerpt_is_truncated() {
        let ledger = FlagLedger::new(5);
        let account = ledger.record_violation(asker(), FlagKind::Spam, "ads", "0123456789");
        assert_eq!(account.flag_reasons()[0].excerpt, "01234");
    }

    #[test]
    fn reset_clears_everything_and_is_idempotent() {
        let ledger = FlagLedger::default();
        let mut account = asker();
        for _ in 0..4 {
            account = ledger.record_violation(account, FlagKind::Drugs, "drugs", "x");
        }
        let account = ledger.reset_violations(account);
        assert_eq!(account.flag_count(), 0);
        assert!(account.flag_reasons().is_empty());
        assert!(!account.is_flagged());

        let again = ledger.reset_violations(account.clone());
        assert_eq!(again, account);
    }

    #[test]
    fn ban_is_terminal_and_distinguishable() {
        let ledger = FlagLedger::default();
        let mut expert = Account::new_expert(AccountId::new(), "Dr. Lee", Category::Legal);
        expert.soft_delete(Timestamp::now());
        assert!(!expert.was_banned_by_admin());

        let banned = ledger.ban_account(asker(), "repeated harassment");
        assert!(banned.is_deleted);
        assert!(banned.deleted_at.is_some());
        assert!(banned.was_banned_by_admin());
        assert_eq!(banned.flag_count(), 1);
        assert!(!banned.is_flagged());
    }

    #[test]
    fn warning_message_counts_up_then_flags() {
        let ledger = FlagLedger::default();
        let account = ledger.record_violation(asker(), FlagKind::Spam, "ads", "x");
        let notice = StrikeNotice::for_account(&account, ViolationType::Spam, "ads");
        assert_eq!(
            notice.warning_message(),
            "Warning 1/3: Further violations may result in account suspension."
        );

        let account = ledger.record_violation(account, FlagKind::Spam, "ads", "x");
        let account = ledger.record_violation(account, FlagKind::Spam, "ads", "x");
        let notice = StrikeNotice::for_account(&account, ViolationType::Spam, "ads");
        assert!(notice.warning_message().contains("flagged for review"));
    }

    #[derive(Debug, Clone)]
    enum LedgerOp {
        Strike,
        Reset,
        Ban,
    }

    fn ledger_op() -> impl Strategy<Value = LedgerOp> {
        prop_oneof![
            6 => Just(LedgerOp::Strike),
            1 => Just(LedgerOp::Reset),
            1 => Just(LedgerOp::Ban),
        ]
    }

    proptest! {
        #[test]
        fn flagged_tracks_threshold_after_every_mutation(ops in prop::collection::vec(ledger_op(), 0..40)) {
            let ledger = FlagLedger::default();
            let mut account = asker();
            for op in ops {
                account = match op {
                    LedgerOp::Strike => ledger.record_violation(account, FlagKind::Spam, "spam", "x"),
                    LedgerOp::Reset => ledger.reset_violations(account),
                    LedgerOp::Ban => ledger.ban_account(account, "ban"),
                };
                prop_assert_eq!(account.is_flagged(), account.flag_count() >= FLAG_THRESHOLD);
                prop_assert_eq!(account.flag_count() as usize, account.flag_reasons().len());
            }
        }

        #[test]
        fn reset_always_clears_history(strikes in 0u32..20) {
            let ledger = FlagLedger::default();
            let mut account = asker();
            for _ in 0..strikes {
                account = ledger.record_violation(account, FlagKind::Violence, "threat", "x");
            }
            let account = ledger.reset_violations(account);
            prop_assert!(!account.is_flagged());
            prop_assert!(account.flag_reasons().is_empty());
            prop_assert_eq!(account.flag_count(), 0);
        }
    }
}
