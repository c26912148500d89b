//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Commands (writes) and queries (reads) are separate handlers; shared
//! services screen content, route questions and keep the violation ledger.

mod account_ledger;
mod actor;
mod content_cleanup;
mod error;
pub mod handlers;
pub(crate) mod lookup;
mod moderation_gate;
mod notifier;
pub(crate) mod retry;
mod routing_engine;
mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use account_ledger::AccountLedger;
pub use actor::Actor;
pub use content_cleanup::ContentCleanup;
pub use error::{EngineError, ErrorKind};
pub use moderation_gate::ModerationGate;
pub use notifier::Notifier;
pub use routing_engine::RoutingEngine;
pub use state::{Engine, EnginePolicy, EnginePorts};
