//! Expert desk handlers: presence, drafting help, session reports and analytics.

mod assistance;
mod expert_analytics;
mod session_reports;
mod set_online_status;

pub use assistance::{
    AssistText, DraftSessionSummaryHandler, DraftSessionSummaryQuery, SuggestAnswerHandler,
    SuggestAnswerQuery, SUGGESTION_FALLBACK, SUMMARY_FALLBACK,
};
pub use expert_analytics::{ExpertAnalytics, ExpertAnalyticsHandler, ExpertAnalyticsQuery};
pub use session_reports::{
    ApproveSessionReportCommand, ApproveSessionReportHandler, CreateSessionReportCommand,
    CreateSessionReportHandler, GetSessionReportHandler, GetSessionReportQuery,
};
pub use set_online_status::{SetOnlineStatusCommand, SetOnlineStatusHandler};

use crate::application::lookup::load_question;
use crate::application::{Actor, EngineError};
use crate::domain::account::Role;
use crate::domain::foundation::QuestionId;
use crate::domain::question::Question;
use crate::ports::{AccountRepository, QuestionRepository};

/// Loads a question the acting expert is assigned to.
async fn assigned_question(
    accounts: &dyn AccountRepository,
    questions: &dyn QuestionRepository,
    actor: Actor,
    question_id: QuestionId,
) -> Result<Question, EngineError> {
    actor.require(Role::Expert)?;
    actor.load_account(accounts).await?;
    let question = load_question(questions, question_id).await?;
    if !question.is_assigned_to(actor.account_id) {
        return Err(EngineError::forbidden("You are not assigned to this question"));
    }
    Ok(question)
}
