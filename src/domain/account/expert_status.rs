//! Expert application status state machine.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Review status of an expert's application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpertStatus {
    /// Submitted, not yet reviewed by an admin.
    Pending,

    /// Verified. Eligible for routing and login.
    Approved,

    /// Declined. The expert cannot log in until re-approved.
    Rejected,
}

impl ExpertStatus {
    /// True only for approved experts.
    pub fn is_verified(&self) -> bool {
        matches!(self, ExpertStatus::Approved)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpertStatus::Pending => "pending",
            ExpertStatus::Approved => "approved",
            ExpertStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for ExpertStatus {
    type Err = crate::domain::foundation::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ExpertStatus::Pending),
            "approved" => Ok(ExpertStatus::Approved),
            "rejected" => Ok(ExpertStatus::Rejected),
            other => Err(crate::domain::foundation::ValidationError::invalid_format(
                "expert_status",
                format!("unknown status '{}'", other),
            )),
        }
    }
}

impl StateMachine for ExpertStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ExpertStatus::*;
        matches!(
            (self, target),
            (Pending, Approved) | (Pending, Rejected) | (Rejected, Approved) | (Approved, Rejected)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ExpertStatus::*;
        match self {
            Pending => vec![Approved, Rejected],
            Approved => vec![Rejected],
            Rejected => vec![Approved],
        }
    }
}
