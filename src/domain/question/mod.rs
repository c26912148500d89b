//! Question module - questions, their conversation and session reports.

mod aggregate;
mod rating;
mod response;
mod session_report;
mod status;

pub use aggregate::{Question, ResolveAction};
pub use rating::Rating;
pub use response::{Response, ResponseAuthor, SenderRole};
pub use session_report::{QaAuthor, QaEntry, ReportStatus, SessionReport};
pub use status::QuestionStatus;
