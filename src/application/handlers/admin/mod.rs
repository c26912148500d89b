//! Admin desk handlers.

mod account_moderation;
mod admin_queries;
mod resolve_flagged_question;
mod verify_expert;

pub use account_moderation::{
    BanAccountCommand, BanAccountHandler, BanAccountResult, ResetViolationsCommand,
    ResetViolationsHandler,
};
pub use admin_queries::{AdminQueriesHandler, AdminQuery, DashboardCounts};
pub use resolve_flagged_question::{ResolveFlaggedQuestionCommand, ResolveFlaggedQuestionHandler};
pub use verify_expert::{VerifyExpertCommand, VerifyExpertHandler};
