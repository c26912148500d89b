//! HTTP DTOs for account endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::account::{Account, ExpertStatus, FlagRecord, Role};
use crate::domain::moderation::Category;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAccountRequest {
    pub display_name: String,
    pub role: Role,
    #[serde(default)]
    pub category: Option<Category>,
}

/// Expert-only fields of an account view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpertView {
    pub category: Category,
    pub status: ExpertStatus,
    pub is_online: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

/// Account as shown to its owner and to admins.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: String,
    pub display_name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expert: Option<ExpertView>,
    pub flag_count: u32,
    pub is_flagged: bool,
    pub flag_reasons: Vec<FlagRecord>,
    pub is_deleted: bool,
    pub created_at: String,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.to_string(),
            role: account.role(),
            expert: account.expert_profile().map(|p| ExpertView {
                category: p.category,
                status: p.status,
                is_online: p.is_online,
                rejection_reason: p.rejection_reason.clone(),
            }),
            flag_count: account.flag_count(),
            is_flagged: account.is_flagged(),
            flag_reasons: account.flag_reasons().to_vec(),
            is_deleted: account.is_deleted,
            created_at: account.created_at.as_datetime().to_rfc3339(),
            display_name: account.display_name,
        }
    }
}
