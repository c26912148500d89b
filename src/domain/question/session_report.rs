//! Session report: a frozen record of a finished conversation.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AccountId, DomainError, ErrorCode, QuestionId, SessionReportId, StateMachine, Timestamp,
};

use super::{Question, Response, SenderRole};

/// Review state of a session report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportStatus {
    Draft,
    Approved,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Draft => "Draft",
            ReportStatus::Approved => "Approved",
        }
    }
}

impl StateMachine for ReportStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!((self, target), (ReportStatus::Draft, ReportStatus::Approved))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            ReportStatus::Draft => vec![ReportStatus::Approved],
            ReportStatus::Approved => vec![],
        }
    }
}

/// Author label of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QaAuthor {
    Asker,
    Expert,
    Ai,
}

impl From<SenderRole> for QaAuthor {
    fn from(role: SenderRole) -> Self {
        match role {
            SenderRole::Asker => QaAuthor::Asker,
            SenderRole::Expert => QaAuthor::Expert,
            SenderRole::Ai => QaAuthor::Ai,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaEntry {
    pub author: QaAuthor,
    pub content: String,
    pub timestamp: Timestamp,
}

/// Snapshot of a question's exchange, written by the assigned expert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub id: SessionReportId,
    pub question_id: QuestionId,
    pub expert_id: AccountId,
    pub summary: String,
    pub status: ReportStatus,
    pub qa_history: Vec<QaEntry>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SessionReport {
    /// Builds a draft from the question and its responses.
    ///
    /// The transcript starts with the question itself, followed by every
    /// response ordered by creation time.
    pub fn draft(
        question: &Question,
        responses: &[Response],
        expert_id: AccountId,
        summary: String,
    ) -> Self {
        let mut ordered: Vec<&Response> = responses.iter().collect();
        ordered.sort_by_key(|r| r.created_at);

        let qa_history = std::iter::once(QaEntry {
            author: QaAuthor::Asker,
            content: question.content.clone(),
            timestamp: question.created_at,
        })
        .chain(ordered.into_iter().map(|r| QaEntry {
            author: r.sender_role().into(),
            content: r.content.clone(),
            timestamp: r.created_at,
        }))
        .collect();

        let now = Timestamp::now();
        Self {
            id: SessionReportId::new(),
            question_id: question.id,
            expert_id,
            summary,
            status: ReportStatus::Draft,
            qa_history,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn approve(&mut self) -> Result<(), DomainError> {
        self.status = self
            .status
            .transition_to(ReportStatus::Approved)
            .map_err(|e| DomainError::new(ErrorCode::InvalidStateTransition, e.to_string()))?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::moderation::{Category, Verdict};
    use crate::domain::question::ResponseAuthor;

    #[test]
    fn draft_snapshots_question_then_responses_in_order() {
        let asker = AccountId::new();
        let expert = AccountId::new();
        let question = Question::from_verdict(
            QuestionId::new(),
            asker,
            "Can my landlord keep the deposit?".into(),
            Category::Legal,
            None,
            &Verdict::safe(Category::Legal, "ok"),
        );
        let mut late = Response::accepted(
            question.id,
            ResponseAuthor::Asker(asker),
            "thanks".into(),
            None,
        );
        let early = Response::accepted(
            question.id,
            ResponseAuthor::Expert(expert),
            "Only for damages".into(),
            None,
        );
        late.created_at = early.created_at.plus_secs(10);

        let report = SessionReport::draft(&question, &[late, early], expert, "summary".into());

        assert_eq!(report.status, ReportStatus::Draft);
        let authors: Vec<_> = report.qa_history.iter().map(|e| e.author).collect();
        assert_eq!(authors, vec![QaAuthor::Asker, QaAuthor::Expert, QaAuthor::Asker]);
        assert_eq!(report.qa_history[1].content, "Only for damages");
    }

    #[test]
    fn approve_only_once() {
        let question = Question::from_verdict(
            QuestionId::new(),
            AccountId::new(),
            "q".into(),
            Category::General,
            None,
            &Verdict::safe(Category::General, "ok"),
        );
        let mut report = SessionReport::draft(&question, &[], AccountId::new(), "s".into());
        report.approve().unwrap();
        assert_eq!(report.status, ReportStatus::Approved);
        assert_eq!(
            report.approve().unwrap_err().code,
            ErrorCode::InvalidStateTransition
        );
    }
}
