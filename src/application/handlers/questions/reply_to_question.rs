//! ReplyToQuestionHandler - post a message in a question's conversation.

use std::sync::Arc;

use crate::application::lookup::load_question;
use crate::application::retry::retry_on_conflict;
use crate::application::{AccountLedger, Actor, EngineError, ModerationGate, Notifier};
use crate::domain::account::Role;
use crate::domain::foundation::QuestionId;
use crate::domain::notification::Notification;
use crate::domain::question::{QuestionStatus, Response, ResponseAuthor};
use crate::ports::{AccountRepository, QuestionRepository, ResponseRepository};

#[derive(Debug, Clone)]
pub struct ReplyToQuestionCommand {
    pub actor: Actor,
    pub question_id: QuestionId,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct ReplyToQuestionResult {
    pub response: Response,
    /// New question status when this reply changed it.
    pub status: Option<QuestionStatus>,
}

pub struct ReplyToQuestionHandler {
    accounts: Arc<dyn AccountRepository>,
    questions: Arc<dyn QuestionRepository>,
    responses: Arc<dyn ResponseRepository>,
    gate: Arc<ModerationGate>,
    strikes: Arc<AccountLedger>,
    notifier: Notifier,
    screen_asker_replies: bool,
}

impl ReplyToQuestionHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        questions: Arc<dyn QuestionRepository>,
        responses: Arc<dyn ResponseRepository>,
        gate: Arc<ModerationGate>,
        strikes: Arc<AccountLedger>,
        notifier: Notifier,
    ) -> Self {
        Self {
            accounts,
            questions,
            responses,
            gate,
            strikes,
            notifier,
            screen_asker_replies: false,
        }
    }

    /// Also screen asker replies, striking the asker on unsafe content.
    pub fn screening_asker_replies(mut self, enabled: bool) -> Self {
        self.screen_asker_replies = enabled;
        self
    }

    pub async fn handle(
        &self,
        cmd: ReplyToQuestionCommand,
    ) -> Result<ReplyToQuestionResult, EngineError> {
        let content = cmd.content.trim().to_string();
        if content.is_empty() {
            return Err(EngineError::validation("Reply content is required"));
        }
        cmd.actor.load_account(self.accounts.as_ref()).await?;

        let question = load_question(self.questions.as_ref(), cmd.question_id).await?;
        let author = match cmd.actor.role {
            Role::Asker if question.is_owned_by(cmd.actor.account_id) => {
                ResponseAuthor::Asker(cmd.actor.account_id)
            }
            Role::Expert if question.is_assigned_to(cmd.actor.account_id) => {
                ResponseAuthor::Expert(cmd.actor.account_id)
            }
            _ => {
                return Err(EngineError::forbidden(
                    "Only the asker and the assigned expert can reply",
                ))
            }
        };
        question.ensure_accepts_replies()?;

        let screened = match author {
            ResponseAuthor::Expert(_) => true,
            ResponseAuthor::Asker(_) => self.screen_asker_replies,
            ResponseAuthor::Ai => false,
        };
        let verdict = if screened {
            Some(self.gate.screen(&content).await?)
        } else {
            None
        };

        if let Some(verdict) = verdict.as_ref().filter(|v| !v.is_safe) {
            let notice = self
                .strikes
                .record_strike(cmd.actor.account_id, verdict, &content)
                .await?;
            tracing::warn!(
                question_id = %question.id,
                author_id = %cmd.actor.account_id,
                role = %cmd.actor.role,
                "reply withheld"
            );
            return Err(EngineError::PolicyViolation(notice));
        }

        let response = Response::accepted(question.id, author, content, verdict);
        self.responses.save(&response).await?;

        let status = if matches!(author, ResponseAuthor::Expert(_)) {
            self.mark_answered(question.id).await?
        } else {
            None
        };

        self.notifier
            .notify(Notification::NewMessage {
                question_id: question.id,
                response: response.clone(),
                status,
            })
            .await;

        Ok(ReplyToQuestionResult { response, status })
    }

    async fn mark_answered(
        &self,
        question_id: QuestionId,
    ) -> Result<Option<QuestionStatus>, EngineError> {
        let questions = self.questions.as_ref();
        let status = retry_on_conflict("Question", || async move {
            let mut question = load_question(questions, question_id).await?;
            if !question.status.is_awaiting_answer() {
                return Ok(None);
            }
            question.record_expert_reply()?;
            questions.update(&question).await?;
            Ok(Some(question.status))
        })
        .await?;

        if let Some(status) = status {
            tracing::info!(question_id = %question_id, status = %status, "question answered");
        }
        Ok(status)
    }
}
