//! HTTP DTOs for admin desk endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::http::accounts::AccountView;
use crate::application::handlers::BanAccountResult;
use crate::domain::account::ExpertDecision;
use crate::domain::question::ResolveAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyDecision {
    Approve,
    Reject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyExpertRequest {
    pub decision: VerifyDecision,
    #[serde(default)]
    pub reason: Option<String>,
}

impl From<VerifyExpertRequest> for ExpertDecision {
    fn from(req: VerifyExpertRequest) -> Self {
        match req.decision {
            VerifyDecision::Approve => ExpertDecision::Approve,
            VerifyDecision::Reject => ExpertDecision::Reject { reason: req.reason },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolveRequest {
    pub action: ResolveAction,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BanRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BanResponse {
    pub account: AccountView,
    pub questions_removed: usize,
    pub assignments_released: usize,
}

impl From<BanAccountResult> for BanResponse {
    fn from(result: BanAccountResult) -> Self {
        Self {
            account: result.account.into(),
            questions_removed: result.questions_removed,
            assignments_released: result.assignments_released,
        }
    }
}
