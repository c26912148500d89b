//! Question repository port.
//!
//! `update` follows the same compare-and-set contract on `version` as
//! [`AccountRepository`](super::AccountRepository).

use async_trait::async_trait;

use crate::domain::foundation::{AccountId, DomainError, QuestionId};
use crate::domain::question::{Question, QuestionStatus};

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Save a new question.
    async fn save(&self, question: &Question) -> Result<(), DomainError>;

    /// Conditionally update an existing question.
    ///
    /// # Errors
    ///
    /// - `QuestionNotFound` if the question doesn't exist
    /// - `ConcurrentModification` if the stored version differs
    async fn update(&self, question: &Question) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &QuestionId) -> Result<Option<Question>, DomainError>;

    /// Questions asked by an asker, newest first.
    async fn find_by_asker(&self, asker_id: &AccountId) -> Result<Vec<Question>, DomainError>;

    /// Questions assigned to an expert, newest first.
    async fn find_by_expert(&self, expert_id: &AccountId) -> Result<Vec<Question>, DomainError>;

    /// Flagged questions, newest first.
    async fn find_flagged(&self) -> Result<Vec<Question>, DomainError>;

    async fn count_by_status(&self, status: QuestionStatus) -> Result<u64, DomainError>;

    async fn count_flagged(&self) -> Result<u64, DomainError>;

    /// Hard-deletes a question.
    ///
    /// # Errors
    ///
    /// - `QuestionNotFound` if the question doesn't exist
    async fn delete(&self, id: &QuestionId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn QuestionRepository) {}
    }
}
