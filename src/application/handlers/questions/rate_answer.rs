//! RateAnswerHandler - the asker's one-time rating of an answered question.

use std::sync::Arc;

use crate::application::lookup::{forbidden, load_question};
use crate::application::retry::retry_on_conflict;
use crate::application::{Actor, EngineError, Notifier};
use crate::domain::account::Role;
use crate::domain::foundation::QuestionId;
use crate::domain::notification::Notification;
use crate::domain::question::{Question, Rating};
use crate::ports::{AccountRepository, QuestionRepository};

#[derive(Debug, Clone)]
pub struct RateAnswerCommand {
    pub actor: Actor,
    pub question_id: QuestionId,
    pub rating: i32,
    pub feedback: Option<String>,
}

pub struct RateAnswerHandler {
    accounts: Arc<dyn AccountRepository>,
    questions: Arc<dyn QuestionRepository>,
    notifier: Notifier,
}

impl RateAnswerHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        questions: Arc<dyn QuestionRepository>,
        notifier: Notifier,
    ) -> Self {
        Self {
            accounts,
            questions,
            notifier,
        }
    }

    /// Rates an answered question.
    ///
    /// A second rating fails with `Conflict` and leaves the stored one intact.
    pub async fn handle(&self, cmd: RateAnswerCommand) -> Result<Question, EngineError> {
        let rating = Rating::new(cmd.rating)?;
        cmd.actor.require(Role::Asker)?;
        cmd.actor.load_account(self.accounts.as_ref()).await?;

        let questions = self.questions.as_ref();
        let asker_id = cmd.actor.account_id;
        let question_id = cmd.question_id;
        let feedback = &cmd.feedback;
        let question = retry_on_conflict("Question", || async move {
            let mut question = load_question(questions, question_id).await?;
            if !question.is_owned_by(asker_id) {
                return Err(forbidden("Only the asker can rate this answer"));
            }
            question.rate(rating, feedback.clone())?;
            questions.update(&question).await?;
            Ok(question)
        })
        .await?;

        tracing::info!(question_id = %question.id, rating = rating.value(), "answer rated");
        self.notifier
            .notify(Notification::RatingUpdated {
                question_id: question.id,
                rating,
                feedback: question.feedback.clone(),
            })
            .await;

        Ok(question)
    }
}
