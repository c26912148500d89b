//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `account` - Askers, experts and admins with their violation ledger
//! - `moderation` - Safety verdicts, categories and classifier reply parsing
//! - `question` - Question lifecycle, responses and session reports
//! - `routing` - Ordered fallback policy for expert assignment
//! - `notification` - Events announced to connected clients

pub mod account;
pub mod foundation;
pub mod moderation;
pub mod notification;
pub mod question;
pub mod routing;
