//! Engine composition: one handler set built from a bundle of ports.

use std::sync::Arc;

use crate::domain::account::{FlagLedger, DEFAULT_EXCERPT_CHARS};
use crate::ports::{
    AIProvider, AccountRepository, ExpertDirectory, NotificationBus, QuestionRepository,
    ResponseRepository, SessionReportRepository,
};

use super::handlers::*;
use super::{AccountLedger, ContentCleanup, ModerationGate, Notifier, RoutingEngine};

/// Every outbound dependency the engine needs.
#[derive(Clone)]
pub struct EnginePorts {
    pub accounts: Arc<dyn AccountRepository>,
    pub directory: Arc<dyn ExpertDirectory>,
    pub questions: Arc<dyn QuestionRepository>,
    pub responses: Arc<dyn ResponseRepository>,
    pub reports: Arc<dyn SessionReportRepository>,
    /// Content safety classifier, normally a failover chain.
    pub classifier: Arc<dyn AIProvider>,
    /// Text generation for expert hints and session summaries.
    pub assistant: Arc<dyn AIProvider>,
    pub bus: Arc<dyn NotificationBus>,
}

/// Tunable moderation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnginePolicy {
    pub screen_asker_replies: bool,
    pub excerpt_chars: usize,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            screen_asker_replies: false,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }
}

/// All operations, ready to be shared across request tasks.
#[derive(Clone)]
pub struct Engine {
    pub register_account: Arc<RegisterAccountHandler>,
    pub delete_own_account: Arc<DeleteOwnAccountHandler>,
    pub check_login_access: Arc<CheckLoginAccessHandler>,

    pub submit_question: Arc<SubmitQuestionHandler>,
    pub reply_to_question: Arc<ReplyToQuestionHandler>,
    pub report_content: Arc<ReportContentHandler>,
    pub rate_answer: Arc<RateAnswerHandler>,
    pub delete_response: Arc<DeleteResponseHandler>,
    pub delete_question: Arc<DeleteQuestionHandler>,
    pub list_my_questions: Arc<ListMyQuestionsHandler>,
    pub question_thread: Arc<GetQuestionThreadHandler>,

    pub set_online_status: Arc<SetOnlineStatusHandler>,
    pub suggest_answer: Arc<SuggestAnswerHandler>,
    pub draft_session_summary: Arc<DraftSessionSummaryHandler>,
    pub create_session_report: Arc<CreateSessionReportHandler>,
    pub approve_session_report: Arc<ApproveSessionReportHandler>,
    pub session_report: Arc<GetSessionReportHandler>,
    pub expert_analytics: Arc<ExpertAnalyticsHandler>,

    pub verify_expert: Arc<VerifyExpertHandler>,
    pub resolve_flagged_question: Arc<ResolveFlaggedQuestionHandler>,
    pub reset_violations: Arc<ResetViolationsHandler>,
    pub ban_account: Arc<BanAccountHandler>,
    pub admin_queries: Arc<AdminQueriesHandler>,
}

impl Engine {
    pub fn new(ports: EnginePorts, policy: EnginePolicy) -> Self {
        let EnginePorts {
            accounts,
            directory,
            questions,
            responses,
            reports,
            classifier,
            assistant,
            bus,
        } = ports;

        let notifier = Notifier::new(bus);
        let gate = Arc::new(ModerationGate::new(classifier));
        let routing = Arc::new(RoutingEngine::new(directory));
        let strikes = Arc::new(AccountLedger::new(
            accounts.clone(),
            FlagLedger::new(policy.excerpt_chars),
        ));
        let cleanup = ContentCleanup::new(
            questions.clone(),
            responses.clone(),
            reports.clone(),
            notifier.clone(),
        );

        Self {
            register_account: Arc::new(RegisterAccountHandler::new(accounts.clone())),
            delete_own_account: Arc::new(DeleteOwnAccountHandler::new(
                accounts.clone(),
                cleanup.clone(),
            )),
            check_login_access: Arc::new(CheckLoginAccessHandler::new(accounts.clone())),

            submit_question: Arc::new(SubmitQuestionHandler::new(
                accounts.clone(),
                questions.clone(),
                gate.clone(),
                routing.clone(),
                strikes.clone(),
                notifier.clone(),
            )),
            reply_to_question: Arc::new(
                ReplyToQuestionHandler::new(
                    accounts.clone(),
                    questions.clone(),
                    responses.clone(),
                    gate,
                    strikes.clone(),
                    notifier.clone(),
                )
                .screening_asker_replies(policy.screen_asker_replies),
            ),
            report_content: Arc::new(ReportContentHandler::new(
                accounts.clone(),
                questions.clone(),
                responses.clone(),
            )),
            rate_answer: Arc::new(RateAnswerHandler::new(
                accounts.clone(),
                questions.clone(),
                notifier.clone(),
            )),
            delete_response: Arc::new(DeleteResponseHandler::new(
                accounts.clone(),
                responses.clone(),
                notifier.clone(),
            )),
            delete_question: Arc::new(DeleteQuestionHandler::new(
                accounts.clone(),
                questions.clone(),
                cleanup.clone(),
            )),
            list_my_questions: Arc::new(ListMyQuestionsHandler::new(
                accounts.clone(),
                questions.clone(),
            )),
            question_thread: Arc::new(GetQuestionThreadHandler::new(
                accounts.clone(),
                questions.clone(),
                responses.clone(),
                reports.clone(),
            )),

            set_online_status: Arc::new(SetOnlineStatusHandler::new(
                accounts.clone(),
                notifier.clone(),
            )),
            suggest_answer: Arc::new(SuggestAnswerHandler::new(
                accounts.clone(),
                questions.clone(),
                assistant.clone(),
            )),
            draft_session_summary: Arc::new(DraftSessionSummaryHandler::new(
                accounts.clone(),
                questions.clone(),
                responses.clone(),
                assistant,
            )),
            create_session_report: Arc::new(CreateSessionReportHandler::new(
                accounts.clone(),
                questions.clone(),
                responses,
                reports.clone(),
            )),
            approve_session_report: Arc::new(ApproveSessionReportHandler::new(
                accounts.clone(),
                reports.clone(),
            )),
            session_report: Arc::new(GetSessionReportHandler::new(
                accounts.clone(),
                questions.clone(),
                reports,
            )),
            expert_analytics: Arc::new(ExpertAnalyticsHandler::new(
                accounts.clone(),
                questions.clone(),
            )),

            verify_expert: Arc::new(VerifyExpertHandler::new(accounts.clone())),
            resolve_flagged_question: Arc::new(ResolveFlaggedQuestionHandler::new(
                accounts.clone(),
                questions.clone(),
                routing,
                notifier,
            )),
            reset_violations: Arc::new(ResetViolationsHandler::new(
                accounts.clone(),
                strikes.clone(),
            )),
            ban_account: Arc::new(BanAccountHandler::new(accounts.clone(), strikes, cleanup)),
            admin_queries: Arc::new(AdminQueriesHandler::new(accounts, questions)),
        }
    }
}
