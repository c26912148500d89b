//! Question aggregate.
//!
//! # Invariants
//!
//! - A question is only ever created after its moderation verdict is known
//! - `rating` is set at most once and only while `status == Answered`
//! - `is_flagged` is independent of the asker's account-level strike count

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AccountId, DomainError, ErrorCode, QuestionId, StateMachine, Timestamp,
};
use crate::domain::moderation::{Category, Verdict};

use super::{QuestionStatus, Rating};

/// Admin decision on a flagged question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveAction {
    Allow,
    Reject,
}

/// A question asked anonymously by an asker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub asker_id: AccountId,
    pub expert_id: Option<AccountId>,
    pub content: String,
    pub category: Category,
    /// Opaque reference to an uploaded file; storage is handled elsewhere.
    pub attachment: Option<String>,
    pub status: QuestionStatus,
    pub is_flagged: bool,
    pub safety_score: f32,
    pub rating: Option<Rating>,
    pub feedback: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub version: u64,
}

impl Question {
    /// Creates a question from content that has already been judged.
    ///
    /// Unsafe content is parked as a flagged, unassigned, pending question.
    pub fn from_verdict(
        id: QuestionId,
        asker_id: AccountId,
        content: String,
        category: Category,
        attachment: Option<String>,
        verdict: &Verdict,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            asker_id,
            expert_id: None,
            content,
            category,
            attachment,
            status: QuestionStatus::Pending,
            is_flagged: !verdict.is_safe,
            safety_score: verdict.safety_score(),
            rating: None,
            feedback: None,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    pub fn is_owned_by(&self, account: AccountId) -> bool {
        self.asker_id == account
    }

    pub fn is_assigned_to(&self, account: AccountId) -> bool {
        self.expert_id == Some(account)
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }

    fn move_to(&mut self, target: QuestionStatus) -> Result<(), DomainError> {
        if self.status == target {
            return Ok(());
        }
        self.status = self
            .status
            .transition_to(target)
            .map_err(|e| DomainError::new(ErrorCode::InvalidStateTransition, e.to_string()))?;
        Ok(())
    }

    pub fn assign_expert(&mut self, expert_id: AccountId) {
        self.expert_id = Some(expert_id);
        self.touch();
    }

    /// Detaches the assigned expert, returning an unanswered question to Pending.
    pub fn unassign_expert(&mut self) {
        self.expert_id = None;
        if self.status == QuestionStatus::InProgress {
            self.status = QuestionStatus::Pending;
        }
        self.touch();
    }

    /// Fails when the conversation no longer accepts replies.
    pub fn ensure_accepts_replies(&self) -> Result<(), DomainError> {
        if self.status == QuestionStatus::Rejected {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Question was rejected and no longer accepts replies",
            ));
        }
        Ok(())
    }

    /// Records that the assigned expert replied. Returns true if the status changed.
    pub fn record_expert_reply(&mut self) -> Result<bool, DomainError> {
        self.ensure_accepts_replies()?;
        if self.status.is_awaiting_answer() {
            self.move_to(QuestionStatus::Answered)?;
            self.touch();
            return Ok(true);
        }
        Ok(false)
    }

    /// Manual escalation. Leaves status untouched.
    pub fn report(&mut self) {
        self.is_flagged = true;
        self.touch();
    }

    /// Applies an admin resolution.
    ///
    /// Returns true when the question is back in the routing pool without an
    /// expert and should be routed again.
    pub fn resolve(&mut self, action: ResolveAction) -> Result<bool, DomainError> {
        self.is_flagged = false;
        match action {
            ResolveAction::Allow => {
                if self.status != QuestionStatus::Answered {
                    self.move_to(QuestionStatus::Pending)?;
                }
            }
            ResolveAction::Reject => self.move_to(QuestionStatus::Rejected)?,
        }
        self.touch();
        Ok(action == ResolveAction::Allow
            && self.status == QuestionStatus::Pending
            && self.expert_id.is_none())
    }

    /// Sets the asker's rating.
    pub fn rate(&mut self, rating: Rating, feedback: Option<String>) -> Result<(), DomainError> {
        if self.status != QuestionStatus::Answered {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Cannot rate an unanswered question",
            ));
        }
        if self.rating.is_some() {
            return Err(DomainError::new(
                ErrorCode::AlreadyRated,
                "You have already rated this answer",
            ));
        }
        self.rating = Some(rating);
        self.feedback = feedback.filter(|f| !f.trim().is_empty());
        self.touch();
        Ok(())
    }
}
