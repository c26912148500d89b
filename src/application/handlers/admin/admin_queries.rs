//! Admin read models: dashboard counts and review queues.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::application::{Actor, EngineError};
use crate::domain::account::{Account, Role};
use crate::domain::question::{Question, QuestionStatus};
use crate::ports::{AccountRepository, QuestionRepository};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCounts {
    pub askers: u64,
    pub experts: u64,
    pub flagged_questions: u64,
    pub flagged_accounts: u64,
    pub pending_applications: u64,
    pub questions_by_status: BTreeMap<String, u64>,
}

/// Every admin query takes only the acting admin.
#[derive(Debug, Clone)]
pub struct AdminQuery {
    pub actor: Actor,
}

/// Serves the dashboard and the three review queues.
pub struct AdminQueriesHandler {
    accounts: Arc<dyn AccountRepository>,
    questions: Arc<dyn QuestionRepository>,
}

impl AdminQueriesHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        questions: Arc<dyn QuestionRepository>,
    ) -> Self {
        Self {
            accounts,
            questions,
        }
    }

    async fn authorize(&self, query: &AdminQuery) -> Result<(), EngineError> {
        query.actor.require(Role::Admin)?;
        query.actor.load_account(self.accounts.as_ref()).await?;
        Ok(())
    }

    pub async fn dashboard(&self, query: AdminQuery) -> Result<DashboardCounts, EngineError> {
        self.authorize(&query).await?;

        let mut questions_by_status = BTreeMap::new();
        for status in QuestionStatus::ALL {
            let count = self.questions.count_by_status(status).await?;
            questions_by_status.insert(status.as_str().to_string(), count);
        }

        Ok(DashboardCounts {
            askers: self.accounts.count_by_role(Role::Asker).await?,
            experts: self.accounts.count_by_role(Role::Expert).await?,
            flagged_questions: self.questions.count_flagged().await?,
            flagged_accounts: self.accounts.list_flagged().await?.len() as u64,
            pending_applications: self.accounts.list_pending_experts().await?.len() as u64,
            questions_by_status,
        })
    }

    /// Questions awaiting a resolve decision, newest first.
    pub async fn flagged_questions(&self, query: AdminQuery) -> Result<Vec<Question>, EngineError> {
        self.authorize(&query).await?;
        Ok(self.questions.find_flagged().await?)
    }

    /// Live accounts at or above the strike threshold.
    pub async fn flagged_accounts(&self, query: AdminQuery) -> Result<Vec<Account>, EngineError> {
        self.authorize(&query).await?;
        Ok(self.accounts.list_flagged().await?)
    }

    pub async fn pending_experts(&self, query: AdminQuery) -> Result<Vec<Account>, EngineError> {
        self.authorize(&query).await?;
        Ok(self.accounts.list_pending_experts().await?)
    }
}
