//! Expert directory port - read-side lookup used by routing.

use async_trait::async_trait;

use crate::domain::foundation::{AccountId, DomainError};
use crate::domain::routing::ExpertCriteria;

/// Finds candidate experts for a question.
///
/// Implementations must only return approved, non-deleted experts and must
/// prefer the most recently created match.
#[async_trait]
pub trait ExpertDirectory: Send + Sync {
    /// Newest expert matching `criteria`, or `None`.
    async fn find_newest_expert(
        &self,
        criteria: &ExpertCriteria,
    ) -> Result<Option<AccountId>, DomainError>;
}
