//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - One classifier / text-generation backend
//! - `AccountRepository`, `ExpertDirectory` - Accounts and expert lookup
//! - `QuestionRepository`, `ResponseRepository`, `SessionReportRepository`
//! - `NotificationBus` - Best-effort broadcast of state changes

mod account_repository;
mod ai_provider;
mod expert_directory;
mod notification_bus;
mod question_repository;
mod response_repository;
mod session_report_repository;

pub use account_repository::AccountRepository;
pub use ai_provider::{
    AIError, AIProvider, CompletionPurpose, CompletionRequest, CompletionResponse, FinishReason,
    ProviderInfo, TokenUsage,
};
pub use expert_directory::ExpertDirectory;
pub use notification_bus::NotificationBus;
pub use question_repository::QuestionRepository;
pub use response_repository::ResponseRepository;
pub use session_report_repository::SessionReportRepository;
