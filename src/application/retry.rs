//! Read-modify-write retry on optimistic-lock conflicts.

use std::future::Future;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Attempts made before a concurrent modification is surfaced as a conflict.
pub const MAX_WRITE_ATTEMPTS: u32 = 3;

/// Runs `attempt` again while it fails with `ConcurrentModification`.
///
/// Each attempt must re-read the entity it writes.
pub async fn retry_on_conflict<T, F, Fut>(entity: &'static str, mut attempt: F) -> Result<T, DomainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    let mut tries = 0;
    loop {
        tries += 1;
        match attempt().await {
            Err(e) if e.code == ErrorCode::ConcurrentModification && tries < MAX_WRITE_ATTEMPTS => {
                tracing::debug!(entity, attempt = tries, "concurrent modification, retrying");
            }
            result => return result,
        }
    }
}
