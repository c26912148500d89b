//! In-memory storage adapters.
//!
//! Used by tests and by the server when no database is configured. Updates
//! follow the same version compare-and-set contract as the Postgres adapters.

mod accounts;
mod questions;

pub use accounts::InMemoryAccountRepository;
pub use questions::{
    InMemoryQuestionRepository, InMemoryResponseRepository, InMemorySessionReportRepository,
};
