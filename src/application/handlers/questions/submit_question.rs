//! SubmitQuestionHandler - moderate, park or route a new question.

use std::sync::Arc;

use crate::application::{
    AccountLedger, Actor, EngineError, ModerationGate, Notifier, RoutingEngine,
};
use crate::domain::account::Role;
use crate::domain::foundation::QuestionId;
use crate::domain::moderation::Category;
use crate::domain::notification::Notification;
use crate::domain::question::Question;
use crate::domain::routing::Assignment;
use crate::ports::{AccountRepository, QuestionRepository};

/// Command to ask a new question.
#[derive(Debug, Clone)]
pub struct SubmitQuestionCommand {
    pub actor: Actor,
    pub content: String,
    /// Asker-selected category. The classifier's category is used when absent.
    pub category: Option<Category>,
    pub attachment: Option<String>,
}

/// Result of a successfully routed submission.
#[derive(Debug, Clone)]
pub struct SubmitQuestionResult {
    pub question: Question,
    pub assignment: Option<Assignment>,
}

pub struct SubmitQuestionHandler {
    accounts: Arc<dyn AccountRepository>,
    questions: Arc<dyn QuestionRepository>,
    gate: Arc<ModerationGate>,
    routing: Arc<RoutingEngine>,
    strikes: Arc<AccountLedger>,
    notifier: Notifier,
}

impl SubmitQuestionHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        questions: Arc<dyn QuestionRepository>,
        gate: Arc<ModerationGate>,
        routing: Arc<RoutingEngine>,
        strikes: Arc<AccountLedger>,
        notifier: Notifier,
    ) -> Self {
        Self {
            accounts,
            questions,
            gate,
            routing,
            strikes,
            notifier,
        }
    }

    /// Submits a question.
    ///
    /// # Errors
    ///
    /// - `ServiceUnavailable` when no classifier answered; nothing is stored
    /// - `PolicyViolation` when the content is unsafe; the question is stored
    ///   flagged and unassigned and the asker takes a strike
    pub async fn handle(
        &self,
        cmd: SubmitQuestionCommand,
    ) -> Result<SubmitQuestionResult, EngineError> {
        // 1. Validate input and caller
        cmd.actor.require(Role::Asker)?;
        let content = cmd.content.trim().to_string();
        if content.is_empty() {
            return Err(EngineError::validation("Question content is required"));
        }
        cmd.actor.load_account(self.accounts.as_ref()).await?;

        // 2. Moderate before anything is written
        let verdict = self.gate.screen(&content).await?;
        let category = cmd.category.unwrap_or(verdict.category);
        let mut question = Question::from_verdict(
            QuestionId::new(),
            cmd.actor.account_id,
            content,
            category,
            cmd.attachment,
            &verdict,
        );

        // 3. Unsafe: park the question and record the strike
        if !verdict.is_safe {
            self.questions.save(&question).await?;
            let notice = self
                .strikes
                .record_strike(cmd.actor.account_id, &verdict, &question.content)
                .await?;
            tracing::warn!(
                question_id = %question.id,
                asker_id = %cmd.actor.account_id,
                violation = verdict.violation_type.as_str(),
                "question quarantined"
            );
            return Err(EngineError::PolicyViolation(notice.with_question(question.id)));
        }

        // 4. Safe: route and persist
        let assignment = self.routing.assign(category).await?;
        if let Some(assignment) = &assignment {
            question.assign_expert(assignment.expert_id);
        }
        self.questions.save(&question).await?;

        // 5. Announce
        self.notifier
            .notify(Notification::NewQuestion {
                question_id: question.id,
                category,
                expert_id: question.expert_id,
            })
            .await;

        Ok(SubmitQuestionResult {
            question,
            assignment,
        })
    }
}
