//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresAccountRepository` - Accounts, also serving as the expert directory
//! - `PostgresQuestionRepository` - Questions
//! - `PostgresResponseRepository` - Conversation messages
//! - `PostgresSessionReportRepository` - One report per question
//!
//! Versioned updates are compare-and-set on the `version` column, matching
//! the in-memory adapters.

mod accounts;
mod questions;
mod responses;
mod session_reports;

pub use accounts::PostgresAccountRepository;
pub use questions::PostgresQuestionRepository;
pub use responses::PostgresResponseRepository;
pub use session_reports::PostgresSessionReportRepository;

use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DomainError::database(format!("Migration failed: {}", e)))
}

fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", context, e))
}

fn corrupt_row(column: &str, detail: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid value in column {}: {}", column, detail),
    )
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|d| d.code())
        .is_some_and(|code| code == "23505")
}
