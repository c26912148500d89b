//! Question status state machine.

use crate::domain::foundation::{StateMachine, ValidationError};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionStatus {
    /// Waiting for an expert answer. Also the parking state for flagged questions.
    Pending,

    #[serde(rename = "In Progress")]
    InProgress,

    /// An expert has replied. Ratable.
    Answered,

    /// Removed by an admin. Can be restored to Pending.
    Rejected,
}

impl QuestionStatus {
    pub const ALL: [QuestionStatus; 4] = [
        QuestionStatus::Pending,
        QuestionStatus::InProgress,
        QuestionStatus::Answered,
        QuestionStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionStatus::Pending => "Pending",
            QuestionStatus::InProgress => "In Progress",
            QuestionStatus::Answered => "Answered",
            QuestionStatus::Rejected => "Rejected",
        }
    }

    /// Statuses in which an assigned expert still owes an answer.
    pub fn is_awaiting_answer(&self) -> bool {
        matches!(self, QuestionStatus::Pending | QuestionStatus::InProgress)
    }
}

impl std::fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QuestionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestionStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("status", format!("unknown status '{}'", s))
            })
    }
}

impl StateMachine for QuestionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use QuestionStatus::*;
        matches!(
            (self, target),
            // From PENDING
            (Pending, InProgress)
                | (Pending, Answered)
                | (Pending, Rejected)
            // From IN_PROGRESS
                | (InProgress, Answered)
                | (InProgress, Rejected)
                | (InProgress, Pending) // Expert removed
            // From ANSWERED
                | (Answered, Rejected)
            // From REJECTED
                | (Rejected, Pending) // Admin override
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use QuestionStatus::*;
        match self {
            Pending => vec![InProgress, Answered, Rejected],
            InProgress => vec![Answered, Rejected, Pending],
            Answered => vec![Rejected],
            Rejected => vec![Pending],
        }
    }
}
