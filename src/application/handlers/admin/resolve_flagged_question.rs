//! ResolveFlaggedQuestionHandler - the way out of the moderation queue.
//!
//! `allow` returns the question to the routing pool (routing it again when it
//! has no expert); `reject` removes it from circulation.

use std::sync::Arc;

use crate::application::lookup::load_question;
use crate::application::retry::retry_on_conflict;
use crate::application::{Actor, EngineError, Notifier, RoutingEngine};
use crate::domain::account::Role;
use crate::domain::foundation::QuestionId;
use crate::domain::notification::Notification;
use crate::domain::question::{Question, QuestionStatus, ResolveAction};
use crate::ports::{AccountRepository, QuestionRepository};

#[derive(Debug, Clone)]
pub struct ResolveFlaggedQuestionCommand {
    pub actor: Actor,
    pub question_id: QuestionId,
    pub action: ResolveAction,
}

pub struct ResolveFlaggedQuestionHandler {
    accounts: Arc<dyn AccountRepository>,
    questions: Arc<dyn QuestionRepository>,
    routing: Arc<RoutingEngine>,
    notifier: Notifier,
}

impl ResolveFlaggedQuestionHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        questions: Arc<dyn QuestionRepository>,
        routing: Arc<RoutingEngine>,
        notifier: Notifier,
    ) -> Self {
        Self {
            accounts,
            questions,
            routing,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: ResolveFlaggedQuestionCommand) -> Result<Question, EngineError> {
        cmd.actor.require(Role::Admin)?;
        cmd.actor.load_account(self.accounts.as_ref()).await?;

        let questions = self.questions.as_ref();
        let question_id = cmd.question_id;
        let action = cmd.action;
        let (mut question, needs_routing) = retry_on_conflict("Question", || async move {
            let mut question = load_question(questions, question_id).await?;
            let needs_routing = question.resolve(action)?;
            questions.update(&question).await?;
            Ok((question, needs_routing))
        })
        .await?;

        tracing::info!(
            question_id = %question_id,
            admin_id = %cmd.actor.account_id,
            action = ?action,
            status = %question.status,
            "flagged question resolved"
        );

        if needs_routing {
            question = self.reroute(question_id).await?;
            self.notifier
                .notify(Notification::NewQuestion {
                    question_id,
                    category: question.category,
                    expert_id: question.expert_id,
                })
                .await;
        }
        Ok(question)
    }

    async fn reroute(&self, question_id: QuestionId) -> Result<Question, EngineError> {
        let questions = self.questions.as_ref();
        let current = load_question(questions, question_id).await?;
        let Some(assignment) = self.routing.assign(current.category).await? else {
            return Ok(current);
        };

        let question = retry_on_conflict("Question", || async move {
            let mut question = load_question(questions, question_id).await?;
            if question.expert_id.is_some() || question.status != QuestionStatus::Pending {
                return Ok(question);
            }
            question.assign_expert(assignment.expert_id);
            questions.update(&question).await?;
            Ok(question)
        })
        .await?;
        Ok(question)
    }
}
