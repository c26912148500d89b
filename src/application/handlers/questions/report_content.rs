//! ReportContentHandler - manual escalation of a question or a reply.

use std::sync::Arc;

use crate::application::lookup::{forbidden, load_question, load_response};
use crate::application::retry::retry_on_conflict;
use crate::application::{Actor, EngineError};
use crate::domain::foundation::{QuestionId, ResponseId};
use crate::domain::question::Question;
use crate::ports::{AccountRepository, QuestionRepository, ResponseRepository};

/// What is being reported. A reply report flags its parent question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTarget {
    Question(QuestionId),
    Response(ResponseId),
}

#[derive(Debug, Clone)]
pub struct ReportContentCommand {
    pub actor: Actor,
    pub target: ReportTarget,
    pub reason: Option<String>,
}

pub struct ReportContentHandler {
    accounts: Arc<dyn AccountRepository>,
    questions: Arc<dyn QuestionRepository>,
    responses: Arc<dyn ResponseRepository>,
}

impl ReportContentHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        questions: Arc<dyn QuestionRepository>,
        responses: Arc<dyn ResponseRepository>,
    ) -> Self {
        Self {
            accounts,
            questions,
            responses,
        }
    }

    /// Flags the question for admin review. Status and strikes are untouched.
    pub async fn handle(&self, cmd: ReportContentCommand) -> Result<Question, EngineError> {
        cmd.actor.load_account(self.accounts.as_ref()).await?;

        let question_id = match cmd.target {
            ReportTarget::Question(id) => id,
            ReportTarget::Response(id) => {
                load_response(self.responses.as_ref(), id).await?.question_id
            }
        };

        let questions = self.questions.as_ref();
        let actor = cmd.actor;
        let question = retry_on_conflict("Question", || async move {
            let mut question = load_question(questions, question_id).await?;
            let participant = question.is_owned_by(actor.account_id)
                || question.is_assigned_to(actor.account_id);
            if !participant && !actor.is_admin() {
                return Err(forbidden("Only participants can report this conversation"));
            }
            question.report();
            questions.update(&question).await?;
            Ok(question)
        })
        .await?;

        tracing::info!(
            question_id = %question_id,
            reporter_id = %actor.account_id,
            target = ?cmd.target,
            reason = cmd.reason.as_deref().unwrap_or(""),
            "content reported"
        );
        Ok(question)
    }
}
