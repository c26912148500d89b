//! Author-driven deletion of replies and questions.

use std::sync::Arc;

use crate::application::lookup::{load_question, load_response};
use crate::application::{Actor, ContentCleanup, EngineError, Notifier};
use crate::domain::account::Role;
use crate::domain::foundation::{QuestionId, ResponseId};
use crate::domain::notification::Notification;
use crate::ports::{AccountRepository, QuestionRepository, ResponseRepository};

#[derive(Debug, Clone)]
pub struct DeleteResponseCommand {
    pub actor: Actor,
    pub response_id: ResponseId,
}

/// Deletes a single reply. Only its author may do so.
pub struct DeleteResponseHandler {
    accounts: Arc<dyn AccountRepository>,
    responses: Arc<dyn ResponseRepository>,
    notifier: Notifier,
}

impl DeleteResponseHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        responses: Arc<dyn ResponseRepository>,
        notifier: Notifier,
    ) -> Self {
        Self {
            accounts,
            responses,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: DeleteResponseCommand) -> Result<(), EngineError> {
        cmd.actor.load_account(self.accounts.as_ref()).await?;
        let response = load_response(self.responses.as_ref(), cmd.response_id).await?;
        if !response.is_authored_by(cmd.actor.account_id) {
            return Err(EngineError::forbidden("You can only delete your own messages"));
        }

        self.responses.delete(&response.id).await?;
        tracing::info!(
            question_id = %response.question_id,
            response_id = %response.id,
            "response deleted"
        );
        self.notifier
            .notify(Notification::MessageDeleted {
                question_id: response.question_id,
                response_id: response.id,
            })
            .await;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DeleteQuestionCommand {
    pub actor: Actor,
    pub question_id: QuestionId,
}

/// Deletes a question with its conversation. The owning asker or an admin.
pub struct DeleteQuestionHandler {
    accounts: Arc<dyn AccountRepository>,
    questions: Arc<dyn QuestionRepository>,
    cleanup: ContentCleanup,
}

impl DeleteQuestionHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        questions: Arc<dyn QuestionRepository>,
        cleanup: ContentCleanup,
    ) -> Self {
        Self {
            accounts,
            questions,
            cleanup,
        }
    }

    pub async fn handle(&self, cmd: DeleteQuestionCommand) -> Result<(), EngineError> {
        cmd.actor.load_account(self.accounts.as_ref()).await?;
        let question = load_question(self.questions.as_ref(), cmd.question_id).await?;

        let allowed = match cmd.actor.role {
            Role::Asker => question.is_owned_by(cmd.actor.account_id),
            Role::Admin => true,
            Role::Expert => false,
        };
        if !allowed {
            return Err(EngineError::forbidden(
                "Only the asker or an admin can delete this question",
            ));
        }

        self.cleanup.remove_question(question.id).await?;
        Ok(())
    }
}
