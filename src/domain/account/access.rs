//! Login access decision.

use serde::Serialize;

use super::{Account, ExpertStatus, RoleProfile};

/// Whether an authenticated account may start a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AccessDecision {
    Allowed,
    SelfDeleted,
    Banned,
    AwaitingVerification,
    ApplicationRejected { reason: Option<String> },
}

impl AccessDecision {
    /// Evaluates access for an account.
    ///
    /// Deletion is checked first; the admin ban record alone distinguishes a
    /// suspension from a self-deletion.
    pub fn evaluate(account: &Account) -> Self {
        if account.is_deleted {
            return if account.was_banned_by_admin() {
                AccessDecision::Banned
            } else {
                AccessDecision::SelfDeleted
            };
        }

        match &account.profile {
            RoleProfile::Expert(p) => match p.status {
                ExpertStatus::Approved => AccessDecision::Allowed,
                ExpertStatus::Pending => AccessDecision::AwaitingVerification,
                ExpertStatus::Rejected => AccessDecision::ApplicationRejected {
                    reason: p.rejection_reason.clone(),
                },
            },
            RoleProfile::Asker | RoleProfile::Admin => AccessDecision::Allowed,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed)
    }

    /// User-facing explanation for a denied login.
    pub fn message(&self) -> Option<String> {
        match self {
            AccessDecision::Allowed => None,
            AccessDecision::SelfDeleted => Some(
                "You deleted your account by yourself. Please use another email to register."
                    .to_string(),
            ),
            AccessDecision::Banned => Some(
                "Your account has been suspended by the admin due to violations.".to_string(),
            ),
            AccessDecision::AwaitingVerification => {
                Some("Your application is being reviewed by our admin team.".to_string())
            }
            AccessDecision::ApplicationRejected { reason } => Some(format!(
                "Application rejected: {}",
                reason
                    .as_deref()
                    .unwrap_or("Your expert application was not approved")
            )),
        }
    }
}
