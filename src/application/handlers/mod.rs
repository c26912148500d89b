//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations, grouped by
//! the desk that invokes them.

pub mod accounts;
pub mod admin;
pub mod expert;
pub mod questions;

pub use accounts::{
    CheckLoginAccessHandler, CheckLoginAccessQuery, DeleteOwnAccountCommand,
    DeleteOwnAccountHandler, LoginAccess, RegisterAccountCommand, RegisterAccountHandler,
};
pub use admin::{
    AdminQueriesHandler, AdminQuery, BanAccountCommand, BanAccountHandler, BanAccountResult,
    DashboardCounts, ResetViolationsCommand, ResetViolationsHandler,
    ResolveFlaggedQuestionCommand, ResolveFlaggedQuestionHandler, VerifyExpertCommand,
    VerifyExpertHandler,
};
pub use expert::{
    ApproveSessionReportCommand, ApproveSessionReportHandler, AssistText,
    CreateSessionReportCommand, CreateSessionReportHandler, DraftSessionSummaryHandler,
    DraftSessionSummaryQuery, ExpertAnalytics, ExpertAnalyticsHandler, ExpertAnalyticsQuery,
    GetSessionReportHandler, GetSessionReportQuery, SetOnlineStatusCommand,
    SetOnlineStatusHandler, SuggestAnswerHandler, SuggestAnswerQuery,
};
pub use questions::{
    DeleteQuestionCommand, DeleteQuestionHandler, DeleteResponseCommand, DeleteResponseHandler,
    GetQuestionThreadHandler, GetQuestionThreadQuery, ListMyQuestionsHandler,
    ListMyQuestionsQuery, QuestionThread, RateAnswerCommand, RateAnswerHandler,
    ReplyToQuestionCommand, ReplyToQuestionHandler, ReplyToQuestionResult, ReportContentCommand,
    ReportContentHandler, ReportTarget, SubmitQuestionCommand, SubmitQuestionHandler,
    SubmitQuestionResult,
};
