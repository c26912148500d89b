//! RegisterAccountHandler - creates asker, expert and admin accounts.
//!
//! Identity verification is upstream; this records the role profile. Experts
//! start as pending applicants. Admins are only created by another admin.

use std::sync::Arc;

use crate::application::{Actor, EngineError};
use crate::domain::account::{Account, Role};
use crate::domain::foundation::AccountId;
use crate::domain::moderation::Category;
use crate::ports::AccountRepository;

const MAX_DISPLAY_NAME_CHARS: usize = 80;

#[derive(Debug, Clone)]
pub struct RegisterAccountCommand {
    pub display_name: String,
    pub role: Role,
    /// Required for experts; ignored otherwise.
    pub category: Option<Category>,
    /// The admin provisioning the account, if any.
    pub created_by: Option<Actor>,
}

pub struct RegisterAccountHandler {
    accounts: Arc<dyn AccountRepository>,
}

impl RegisterAccountHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    pub async fn handle(&self, cmd: RegisterAccountCommand) -> Result<Account, EngineError> {
        let name = cmd.display_name.trim();
        if name.is_empty() {
            return Err(EngineError::validation("Display name is required"));
        }
        if name.chars().count() > MAX_DISPLAY_NAME_CHARS {
            return Err(EngineError::validation(format!(
                "Display name must be at most {} characters",
                MAX_DISPLAY_NAME_CHARS
            )));
        }

        let id = AccountId::new();
        let account = match cmd.role {
            Role::Asker => Account::new_asker(id, name),
            Role::Expert => {
                let category = cmd
                    .category
                    .ok_or_else(|| EngineError::validation("Experts must choose a category"))?;
                Account::new_expert(id, name, category)
            }
            Role::Admin => {
                let creator = cmd
                    .created_by
                    .ok_or_else(|| EngineError::forbidden("Admin accounts cannot self-register"))?;
                creator.require(Role::Admin)?;
                creator.load_account(self.accounts.as_ref()).await?;
                Account::new_admin(id, name)
            }
        };

        self.accounts.save(&account).await?;
        tracing::info!(account_id = %account.id, role = %cmd.role, "account registered");
        Ok(account)
    }
}
