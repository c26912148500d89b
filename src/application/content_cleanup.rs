//! Cascades run when questions or whole accounts go away.

use std::sync::Arc;

use crate::domain::foundation::{AccountId, DomainError, ErrorCode, QuestionId};
use crate::domain::notification::Notification;
use crate::ports::{QuestionRepository, ResponseRepository, SessionReportRepository};

use super::retry::retry_on_conflict;
use super::Notifier;

#[derive(Clone)]
pub struct ContentCleanup {
    questions: Arc<dyn QuestionRepository>,
    responses: Arc<dyn ResponseRepository>,
    reports: Arc<dyn SessionReportRepository>,
    notifier: Notifier,
}

impl ContentCleanup {
    pub fn new(
        questions: Arc<dyn QuestionRepository>,
        responses: Arc<dyn ResponseRepository>,
        reports: Arc<dyn SessionReportRepository>,
        notifier: Notifier,
    ) -> Self {
        Self {
            questions,
            responses,
            reports,
            notifier,
        }
    }

    /// Hard-deletes a question with its responses and report, then announces it.
    pub async fn remove_question(&self, question_id: QuestionId) -> Result<(), DomainError> {
        let removed = self.responses.delete_by_question(&question_id).await?;
        self.reports.delete_by_question(&question_id).await?;
        self.questions.delete(&question_id).await?;

        tracing::info!(question_id = %question_id, responses = removed, "question removed");
        self.notifier
            .notify(Notification::QuestionDeleted { question_id })
            .await;
        Ok(())
    }

    /// Removes every question an asker owns. Returns how many were removed.
    pub async fn remove_asker_content(&self, asker_id: AccountId) -> Result<usize, DomainError> {
        let owned = self.questions.find_by_asker(&asker_id).await?;
        let mut removed = 0;
        for question in owned {
            match self.remove_question(question.id).await {
                Ok(()) => removed += 1,
                // Lost a race with another deletion.
                Err(e) if e.code == ErrorCode::QuestionNotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(removed)
    }

    /// Detaches an expert from every question still awaiting an answer.
    ///
    /// Answered and rejected questions keep their expert for history.
    pub async fn release_expert_assignments(
        &self,
        expert_id: AccountId,
    ) -> Result<usize, DomainError> {
        let assigned = self.questions.find_by_expert(&expert_id).await?;
        let mut released = 0;
        for question in assigned.iter().filter(|q| q.status.is_awaiting_answer()) {
            let id = question.id;
            let changed = retry_on_conflict("Question", || async move {
                let Some(mut current) = self.questions.find_by_id(&id).await? else {
                    return Ok(false);
                };
                if !current.is_assigned_to(expert_id) || !current.status.is_awaiting_answer() {
                    return Ok(false);
                }
                current.unassign_expert();
                self.questions.update(&current).await?;
                Ok(true)
            })
            .await?;
            if changed {
                released += 1;
            }
        }

        if released > 0 {
            tracing::info!(expert_id = %expert_id, released, "expert assignments released");
        }
        Ok(released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryQuestionRepository, InMemoryResponseRepository, InMemorySessionReportRepository,
    };
    use crate::adapters::notifications::RecordingNotificationBus;
    use crate::domain::moderation::{Category, Verdict};
    use crate::domain::question::{Question, QuestionStatus, Response, ResponseAuthor, SessionReport};

    struct Fixture {
        questions: Arc<InMemoryQuestionRepository>,
        responses: Arc<InMemoryResponseRepository>,
        reports: Arc<InMemorySessionReportRepository>,
        bus: RecordingNotificationBus,
        cleanup: ContentCleanup,
    }

    fn fixture() -> Fixture {
        let questions = Arc::new(InMemoryQuestionRepository::new());
        let responses = Arc::new(InMemoryResponseRepository::new());
        let reports = Arc::new(InMemorySessionReportRepository::new());
        let bus = RecordingNotificationBus::new();
        let cleanup = ContentCleanup::new(
            questions.clone(),
            responses.clone(),
            reports.clone(),
            Notifier::new(Arc::new(bus.clone())),
        );
        Fixture {
            questions,
            responses,
            reports,
            bus,
            cleanup,
        }
    }

    async fn question(f: &Fixture, asker: AccountId, expert: Option<AccountId>) -> Question {
        let mut q = Question::from_verdict(
            QuestionId::new(),
            asker,
            "question".into(),
            Category::Legal,
            None,
            &Verdict::safe(Category::Legal, "ok"),
        );
        if let Some(e) = expert {
            q.assign_expert(e);
        }
        f.questions.save(&q).await.unwrap();
        q
    }

    #[tokio::test]
    async fn removing_asker_content_cascades() {
        let f = fixture();
        let asker = AccountId::new();
        let expert = AccountId::new();
        let q1 = question(&f, asker, Some(expert)).await;
        question(&f, asker, None).await;
        let other = question(&f, AccountId::new(), None).await;

        f.responses
            .save(&Response::accepted(
                q1.id,
                ResponseAuthor::Expert(expert),
                "answer".into(),
                None,
            ))
            .await
            .unwrap();
        f.reports
            .save(&SessionReport::draft(&q1, &[], expert, "s".into()))
            .await
            .unwrap();

        let removed = f.cleanup.remove_asker_content(asker).await.unwrap();

        assert_eq!(removed, 2);
        assert!(f.questions.find_by_asker(&asker).await.unwrap().is_empty());
        assert!(f.responses.find_by_question(&q1.id).await.unwrap().is_empty());
        assert!(f.reports.find_by_question(&q1.id).await.unwrap().is_none());
        assert!(f.questions.find_by_id(&other.id).await.unwrap().is_some());
        assert_eq!(f.bus.names(), vec!["question_deleted", "question_deleted"]);
    }

    #[tokio::test]
    async fn releasing_expert_keeps_answered_history() {
        let f = fixture();
        let expert = AccountId::new();
        let open = question(&f, AccountId::new(), Some(expert)).await;
        let mut answered = question(&f, AccountId::new(), Some(expert)).await;
        answered.record_expert_reply().unwrap();
        f.questions.update(&answered).await.unwrap();

        let released = f.cleanup.release_expert_assignments(expert).await.unwrap();

        assert_eq!(released, 1);
        let open = f.questions.find_by_id(&open.id).await.unwrap().unwrap();
        assert!(open.expert_id.is_none());
        assert_eq!(open.status, QuestionStatus::Pending);
        let answered = f.questions.find_by_id(&answered.id).await.unwrap().unwrap();
        assert_eq!(answered.expert_id, Some(expert));
        assert!(f.bus.names().is_empty());
    }
}
