//! Question lifecycle command and query handlers.

mod delete_content;
mod question_queries;
mod rate_answer;
mod reply_to_question;
mod report_content;
mod submit_question;

pub use delete_content::{
    DeleteQuestionCommand, DeleteQuestionHandler, DeleteResponseCommand, DeleteResponseHandler,
};
pub use question_queries::{
    GetQuestionThreadHandler, GetQuestionThreadQuery, ListMyQuestionsHandler,
    ListMyQuestionsQuery, QuestionThread,
};
pub use rate_answer::{RateAnswerCommand, RateAnswerHandler};
pub use reply_to_question::{ReplyToQuestionCommand, ReplyToQuestionHandler, ReplyToQuestionResult};
pub use report_content::{ReportContentCommand, ReportContentHandler, ReportTarget};
pub use submit_question::{SubmitQuestionCommand, SubmitQuestionHandler, SubmitQuestionResult};
