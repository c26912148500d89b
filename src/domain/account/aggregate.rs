//! Account aggregate.
//!
//! An account is an asker, an expert or an admin. Role-specific data lives in
//! [`RoleProfile`], so capability checks match on the variant instead of
//! inspecting optional fields.
//!
//! # Invariants
//!
//! - `flag_count` and `flag_reasons` change only through [`FlagLedger`](super::FlagLedger)
//! - `is_flagged()` is always `flag_count >= FLAG_THRESHOLD`
//! - Accounts are never hard-deleted; `deleted_at` is set iff `is_deleted`

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AccountId, DomainError, ErrorCode, StateMachine, Timestamp, ValidationError,
};
use crate::domain::moderation::Category;

use super::{ExpertStatus, FlagRecord, FLAG_THRESHOLD};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Asker,
    Expert,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Asker => "asker",
            Role::Expert => "expert",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asker" | "user" => Ok(Role::Asker),
            "expert" => Ok(Role::Expert),
            "admin" => Ok(Role::Admin),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}

/// Expert-only account data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertProfile {
    pub category: Category,
    pub status: ExpertStatus,
    pub is_online: bool,
    pub rejection_reason: Option<String>,
}

impl ExpertProfile {
    /// A freshly submitted application.
    pub fn applicant(category: Category) -> Self {
        Self {
            category,
            status: ExpertStatus::Pending,
            is_online: false,
            rejection_reason: None,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.status.is_verified()
    }
}

/// Role-tagged account data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleProfile {
    Asker,
    Expert(ExpertProfile),
    Admin,
}

/// Admin decision on an expert application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpertDecision {
    Approve,
    Reject { reason: Option<String> },
}

/// Account aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub display_name: String,
    pub profile: RoleProfile,

    pub(crate) flag_count: u32,
    pub(crate) flag_reasons: Vec<FlagRecord>,

    pub is_deleted: bool,
    pub deleted_at: Option<Timestamp>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,

    /// Optimistic concurrency token, bumped by the repository on every update.
    pub version: u64,
}

impl Account {
    fn create(id: AccountId, display_name: impl Into<String>, profile: RoleProfile) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            display_name: display_name.into(),
            profile,
            flag_count: 0,
            flag_reasons: Vec::new(),
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    pub fn new_asker(id: AccountId, display_name: impl Into<String>) -> Self {
        Self::create(id, display_name, RoleProfile::Asker)
    }

    /// Creates an expert whose application awaits review.
    pub fn new_expert(id: AccountId, display_name: impl Into<String>, category: Category) -> Self {
        Self::create(
            id,
            display_name,
            RoleProfile::Expert(ExpertProfile::applicant(category)),
        )
    }

    pub fn new_admin(id: AccountId, display_name: impl Into<String>) -> Self {
        Self::create(id, display_name, RoleProfile::Admin)
    }

    /// Rebuilds an account from persisted state.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: AccountId,
        display_name: String,
        profile: RoleProfile,
        flag_count: u32,
        flag_reasons: Vec<FlagRecord>,
        deleted_at: Option<Timestamp>,
        created_at: Timestamp,
        updated_at: Timestamp,
        version: u64,
    ) -> Self {
        Self {
            id,
            display_name,
            profile,
            flag_count,
            flag_reasons,
            is_deleted: deleted_at.is_some(),
            deleted_at,
            created_at,
            updated_at,
            version,
        }
    }

    /// Builder-style override of the creation time, used for seeding.
    pub fn created_at(mut self, at: Timestamp) -> Self {
        self.created_at = at;
        self.updated_at = at;
        self
    }

    pub fn role(&self) -> Role {
        match self.profile {
            RoleProfile::Asker => Role::Asker,
            RoleProfile::Expert(_) => Role::Expert,
            RoleProfile::Admin => Role::Admin,
        }
    }

    pub fn flag_count(&self) -> u32 {
        self.flag_count
    }

    /// Violation history in chronological order.
    pub fn flag_reasons(&self) -> &[FlagRecord] {
        &self.flag_reasons
    }

    /// Advisory three-strike flag. Does not block access.
    pub fn is_flagged(&self) -> bool {
        self.flag_count >= FLAG_THRESHOLD
    }

    /// True when an admin ban record exists in the history.
    pub fn was_banned_by_admin(&self) -> bool {
        self.flag_reasons.iter().any(FlagRecord::is_admin_ban)
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    pub fn expert_profile(&self) -> Option<&ExpertProfile> {
        match &self.profile {
            RoleProfile::Expert(p) => Some(p),
            _ => None,
        }
    }

    /// True for approved, non-deleted experts.
    pub fn is_routable_expert(&self) -> bool {
        self.is_active() && self.expert_profile().is_some_and(ExpertProfile::is_verified)
    }

    fn expert_profile_mut(&mut self) -> Result<&mut ExpertProfile, DomainError> {
        let id = self.id;
        match &mut self.profile {
            RoleProfile::Expert(p) => Ok(p),
            _ => Err(DomainError::new(
                ErrorCode::Forbidden,
                format!("Account {} is not an expert", id),
            )),
        }
    }

    /// Updates an expert's presence. Returns whether the value changed.
    pub fn set_online(&mut self, online: bool) -> Result<bool, DomainError> {
        let profile = self.expert_profile_mut()?;
        let changed = profile.is_online != online;
        profile.is_online = online;
        if changed {
            self.updated_at = Timestamp::now();
        }
        Ok(changed)
    }

    /// Applies an admin decision to an expert application.
    pub fn review_application(&mut self, decision: ExpertDecision) -> Result<(), DomainError> {
        let profile = self.expert_profile_mut()?;
        let (target, reason) = match decision {
            ExpertDecision::Approve => (ExpertStatus::Approved, None),
            ExpertDecision::Reject { reason } => (ExpertStatus::Rejected, reason),
        };

        profile.status = profile.status.transition_to(target).map_err(|e| {
            DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
        })?;
        profile.rejection_reason = reason;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Marks the account deleted. Idempotent; the first deletion time is kept.
    pub fn soft_delete(&mut self, at: Timestamp) {
        if self.is_deleted {
            return;
        }
        self.is_deleted = true;
        self.deleted_at = Some(at);
        if let RoleProfile::Expert(p) = &mut self.profile {
            p.is_online = false;
        }
        self.updated_at = at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approved_expert(category: Category) -> Account {
        let mut expert = Account::new_expert(AccountId::new(), "Dr. Lee", category);
        expert.review_application(ExpertDecision::Approve).unwrap();
        expert
    }

    #[test]
    fn new_accounts_start_clean() {
        let asker = Account::new_asker(AccountId::new(), "anon");
        assert_eq!(asker.role(), Role::Asker);
        assert_eq!(asker.flag_count(), 0);
        assert!(!asker.is_flagged());
        assert!(asker.is_active());
        assert_eq!(asker.version, 0);
    }

    #[test]
    fn new_expert_is_pending_and_not_routable() {
        let expert = Account::new_expert(AccountId::new(), "Dr. Lee", Category::Legal);
        assert_eq!(expert.expert_profile().unwrap().status, ExpertStatus::Pending);
        assert!(!expert.is_routable_expert());
    }

    #[test]
    fn approved_expert_is_routable_until_deleted() {
        let mut expert = approved_expert(Category::Career);
        assert!(expert.is_routable_expert());

        expert.soft_delete(Timestamp::now());
        assert!(!expert.is_routable_expert());
        assert!(expert.deleted_at.is_some());
    }

    #[test]
    fn rejection_keeps_reason_and_approval_clears_it() {
        let mut expert = Account::new_expert(AccountId::new(), "Dr. Lee", Category::Legal);
        expert
            .review_application(ExpertDecision::Reject {
                reason: Some("license not verifiable".into()),
            })
            .unwrap();
        let p = expert.expert_profile().unwrap();
        assert_eq!(p.status, ExpertStatus::Rejected);
        assert_eq!(p.rejection_reason.as_deref(), Some("license not verifiable"));

        expert.review_application(ExpertDecision::Approve).unwrap();
        assert!(expert.expert_profile().unwrap().rejection_reason.is_none());
    }

    #[test]
    fn approving_twice_is_an_invalid_transition() {
        let mut expert = approved_expert(Category::Legal);
        let err = expert.review_application(ExpertDecision::Approve).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn askers_cannot_go_online() {
        let mut asker = Account::new_asker(AccountId::new(), "anon");
        let err = asker.set_online(true).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[test]
    fn set_online_reports_changes() {
        let mut expert = approved_expert(Category::Health);
        assert!(expert.set_online(true).unwrap());
        assert!(!expert.set_online(true).unwrap());
        assert!(expert.expert_profile().unwrap().is_online);
    }

    #[test]
    fn soft_delete_is_idempotent_and_takes_expert_offline() {
        let mut expert = approved_expert(Category::Health);
        expert.set_online(true).unwrap();
        let first = Timestamp::now();
        expert.soft_delete(first);
        expert.soft_delete(first.plus_secs(60));

        assert_eq!(expert.deleted_at, Some(first));
        assert!(!expert.expert_profile().unwrap().is_online);
    }

    #[test]
    fn role_parses_legacy_user_label() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::Asker);
        assert_eq!("Expert".parse::<Role>().unwrap(), Role::Expert);
        assert!("moderator".parse::<Role>().is_err());
    }
}
