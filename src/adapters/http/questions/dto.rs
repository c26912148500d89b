//! HTTP DTOs for question endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{ReplyToQuestionResult, SubmitQuestionResult};
use crate::domain::moderation::Category;
use crate::domain::question::{Question, QuestionStatus, Response};
use crate::domain::routing::FallbackStep;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuestionRequest {
    pub content: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub attachment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplyRequest {
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateRequest {
    pub rating: i32,
    #[serde(default)]
    pub feedback: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Question as shown to participants.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: String,
    pub asker_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expert_id: Option<String>,
    pub content: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
    pub status: QuestionStatus,
    pub is_flagged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Question> for QuestionView {
    fn from(q: Question) -> Self {
        Self {
            id: q.id.to_string(),
            asker_id: q.asker_id.to_string(),
            expert_id: q.expert_id.map(|e| e.to_string()),
            content: q.content,
            category: q.category,
            attachment: q.attachment,
            status: q.status,
            is_flagged: q.is_flagged,
            rating: q.rating.map(|r| r.value()),
            feedback: q.feedback,
            created_at: q.created_at.as_datetime().to_rfc3339(),
            updated_at: q.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuestionResponse {
    pub question: QuestionView,
    /// Fallback step that found the expert; absent when nobody was available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routed_by: Option<FallbackStep>,
}

impl From<SubmitQuestionResult> for SubmitQuestionResponse {
    fn from(result: SubmitQuestionResult) -> Self {
        Self {
            question: result.question.into(),
            routed_by: result.assignment.map(|a| a.step),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    pub response: Response,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<QuestionStatus>,
}

impl From<ReplyToQuestionResult> for ReplyResponse {
    fn from(result: ReplyToQuestionResult) -> Self {
        Self {
            response: result.response,
            status: result.status,
        }
    }
}
