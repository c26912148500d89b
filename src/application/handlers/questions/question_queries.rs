//! Read-side handlers for questions.

use std::sync::Arc;

use serde::Serialize;

use crate::application::lookup::load_question;
use crate::application::{Actor, EngineError};
use crate::domain::account::Role;
use crate::domain::foundation::QuestionId;
use crate::domain::question::{Question, Response, SessionReport};
use crate::ports::{
    AccountRepository, QuestionRepository, ResponseRepository, SessionReportRepository,
};

#[derive(Debug, Clone)]
pub struct ListMyQuestionsQuery {
    pub actor: Actor,
}

/// Asker: questions they asked. Expert: questions assigned to them.
pub struct ListMyQuestionsHandler {
    accounts: Arc<dyn AccountRepository>,
    questions: Arc<dyn QuestionRepository>,
}

impl ListMyQuestionsHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        questions: Arc<dyn QuestionRepository>,
    ) -> Self {
        Self {
            accounts,
            questions,
        }
    }

    pub async fn handle(&self, query: ListMyQuestionsQuery) -> Result<Vec<Question>, EngineError> {
        query.actor.load_account(self.accounts.as_ref()).await?;
        let id = query.actor.account_id;
        let questions = match query.actor.role {
            Role::Asker => self.questions.find_by_asker(&id).await?,
            Role::Expert => self.questions.find_by_expert(&id).await?,
            Role::Admin => {
                return Err(EngineError::forbidden(
                    "Admins review questions through the moderation queue",
                ))
            }
        };
        Ok(questions)
    }
}

#[derive(Debug, Clone)]
pub struct GetQuestionThreadQuery {
    pub actor: Actor,
    pub question_id: QuestionId,
}

/// A question with its conversation and report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionThread {
    pub question: Question,
    pub responses: Vec<Response>,
    pub session_report: Option<SessionReport>,
}

pub struct GetQuestionThreadHandler {
    accounts: Arc<dyn AccountRepository>,
    questions: Arc<dyn QuestionRepository>,
    responses: Arc<dyn ResponseRepository>,
    reports: Arc<dyn SessionReportRepository>,
}

impl GetQuestionThreadHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        questions: Arc<dyn QuestionRepository>,
        responses: Arc<dyn ResponseRepository>,
        reports: Arc<dyn SessionReportRepository>,
    ) -> Self {
        Self {
            accounts,
            questions,
            responses,
            reports,
        }
    }

    pub async fn handle(&self, query: GetQuestionThreadQuery) -> Result<QuestionThread, EngineError> {
        query.actor.load_account(self.accounts.as_ref()).await?;
        let question = load_question(self.questions.as_ref(), query.question_id).await?;

        let id = query.actor.account_id;
        if !(question.is_owned_by(id) || question.is_assigned_to(id) || query.actor.is_admin()) {
            return Err(EngineError::forbidden("You are not part of this conversation"));
        }

        let responses = self.responses.find_by_question(&question.id).await?;
        let session_report = self.reports.find_by_question(&question.id).await?;
        Ok(QuestionThread {
            question,
            responses,
            session_report,
        })
    }
}
