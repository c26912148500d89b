//! Response repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, QuestionId, ResponseId};
use crate::domain::question::Response;

#[async_trait]
pub trait ResponseRepository: Send + Sync {
    async fn save(&self, response: &Response) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &ResponseId) -> Result<Option<Response>, DomainError>;

    /// Responses of a question, oldest first.
    async fn find_by_question(&self, question_id: &QuestionId)
        -> Result<Vec<Response>, DomainError>;

    /// # Errors
    ///
    /// - `ResponseNotFound` if the response doesn't exist
    async fn delete(&self, id: &ResponseId) -> Result<(), DomainError>;

    /// Removes every response of a question, returning how many were removed.
    async fn delete_by_question(&self, question_id: &QuestionId) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ResponseRepository) {}
    }
}
