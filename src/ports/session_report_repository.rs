//! Session report repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, QuestionId};
use crate::domain::question::SessionReport;

/// Storage for session reports; at most one per question.
#[async_trait]
pub trait SessionReportRepository: Send + Sync {
    /// Save a new report.
    ///
    /// # Errors
    ///
    /// - `ReportAlreadyExists` if the question already has a report
    async fn save(&self, report: &SessionReport) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `SessionReportNotFound` if the report doesn't exist
    async fn update(&self, report: &SessionReport) -> Result<(), DomainError>;

    async fn find_by_question(
        &self,
        question_id: &QuestionId,
    ) -> Result<Option<SessionReport>, DomainError>;

    /// Removes the report of a question if there is one.
    async fn delete_by_question(&self, question_id: &QuestionId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_report_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SessionReportRepository) {}
    }
}
