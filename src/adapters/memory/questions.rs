//! In-memory question, response and session report stores.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{AccountId, DomainError, ErrorCode, QuestionId, ResponseId};
use crate::domain::question::{Question, QuestionStatus, Response, SessionReport};
use crate::ports::{QuestionRepository, ResponseRepository, SessionReportRepository};

fn newest_first(mut questions: Vec<Question>) -> Vec<Question> {
    questions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    questions
}

fn question_not_found(id: &QuestionId) -> DomainError {
    DomainError::new(
        ErrorCode::QuestionNotFound,
        format!("Question not found: {}", id),
    )
}

/// Questions keyed by id.
#[derive(Default)]
pub struct InMemoryQuestionRepository {
    questions: RwLock<HashMap<QuestionId, Question>>,
}

impl InMemoryQuestionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.questions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.questions.read().await.is_empty()
    }

    async fn select(&self, keep: impl Fn(&Question) -> bool) -> Vec<Question> {
        let questions = self.questions.read().await;
        newest_first(questions.values().filter(|q| keep(q)).cloned().collect())
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn save(&self, question: &Question) -> Result<(), DomainError> {
        let mut questions = self.questions.write().await;
        if questions.contains_key(&question.id) {
            return Err(DomainError::new(
                ErrorCode::AlreadyExists,
                format!("Question {} already exists", question.id),
            ));
        }
        questions.insert(question.id, question.clone());
        Ok(())
    }

    async fn update(&self, question: &Question) -> Result<(), DomainError> {
        let mut questions = self.questions.write().await;
        let stored = questions
            .get_mut(&question.id)
            .ok_or_else(|| question_not_found(&question.id))?;
        if stored.version != question.version {
            return Err(DomainError::concurrent_modification("Question", question.id));
        }
        let mut next = question.clone();
        next.version += 1;
        *stored = next;
        Ok(())
    }

    async fn find_by_id(&self, id: &QuestionId) -> Result<Option<Question>, DomainError> {
        Ok(self.questions.read().await.get(id).cloned())
    }

    async fn find_by_asker(&self, asker_id: &AccountId) -> Result<Vec<Question>, DomainError> {
        Ok(self.select(|q| q.is_owned_by(*asker_id)).await)
    }

    async fn find_by_expert(&self, expert_id: &AccountId) -> Result<Vec<Question>, DomainError> {
        Ok(self.select(|q| q.is_assigned_to(*expert_id)).await)
    }

    async fn find_flagged(&self) -> Result<Vec<Question>, DomainError> {
        Ok(self.select(|q| q.is_flagged).await)
    }

    async fn count_by_status(&self, status: QuestionStatus) -> Result<u64, DomainError> {
        let questions = self.questions.read().await;
        Ok(questions.values().filter(|q| q.status == status).count() as u64)
    }

    async fn count_flagged(&self) -> Result<u64, DomainError> {
        let questions = self.questions.read().await;
        Ok(questions.values().filter(|q| q.is_flagged).count() as u64)
    }

    async fn delete(&self, id: &QuestionId) -> Result<(), DomainError> {
        self.questions
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| question_not_found(id))
    }
}

/// Responses keyed by id.
#[derive(Default)]
pub struct InMemoryResponseRepository {
    responses: RwLock<HashMap<ResponseId, Response>>,
}

impl InMemoryResponseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.responses.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.responses.read().await.is_empty()
    }
}

#[async_trait]
impl ResponseRepository for InMemoryResponseRepository {
    async fn save(&self, response: &Response) -> Result<(), DomainError> {
        self.responses
            .write()
            .await
            .insert(response.id, response.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ResponseId) -> Result<Option<Response>, DomainError> {
        Ok(self.responses.read().await.get(id).cloned())
    }

    async fn find_by_question(
        &self,
        question_id: &QuestionId,
    ) -> Result<Vec<Response>, DomainError> {
        let responses = self.responses.read().await;
        let mut thread: Vec<Response> = responses
            .values()
            .filter(|r| r.question_id == *question_id)
            .cloned()
            .collect();
        thread.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(thread)
    }

    async fn delete(&self, id: &ResponseId) -> Result<(), DomainError> {
        self.responses
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::ResponseNotFound,
                    format!("Response not found: {}", id),
                )
            })
    }

    async fn delete_by_question(&self, question_id: &QuestionId) -> Result<u64, DomainError> {
        let mut responses = self.responses.write().await;
        let before = responses.len();
        responses.retain(|_, r| r.question_id != *question_id);
        Ok((before - responses.len()) as u64)
    }
}

/// Session reports keyed by question; at most one per question.
#[derive(Default)]
pub struct InMemorySessionReportRepository {
    reports: RwLock<HashMap<QuestionId, SessionReport>>,
}

impl InMemorySessionReportRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionReportRepository for InMemorySessionReportRepository {
    async fn save(&self, report: &SessionReport) -> Result<(), DomainError> {
        let mut reports = self.reports.write().await;
        if reports.contains_key(&report.question_id) {
            return Err(DomainError::new(
                ErrorCode::ReportAlreadyExists,
                "Session report already exists for this question",
            ));
        }
        reports.insert(report.question_id, report.clone());
        Ok(())
    }

    async fn update(&self, report: &SessionReport) -> Result<(), DomainError> {
        let mut reports = self.reports.write().await;
        match reports.get_mut(&report.question_id) {
            Some(stored) if stored.id == report.id => {
                *stored = report.clone();
                Ok(())
            }
            _ => Err(DomainError::new(
                ErrorCode::SessionReportNotFound,
                format!("Session report not found: {}", report.id),
            )),
        }
    }

    async fn find_by_question(
        &self,
        question_id: &QuestionId,
    ) -> Result<Option<SessionReport>, DomainError> {
        Ok(self.reports.read().await.get(question_id).cloned())
    }

    async fn delete_by_question(&self, question_id: &QuestionId) -> Result<(), DomainError> {
        self.reports.write().await.remove(question_id);
        Ok(())
    }
}
