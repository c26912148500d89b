//! AI drafting help for experts.
//!
//! Both handlers use the same backend chain as moderation. A generation
//! failure is not an error for the expert: a fixed fallback text is returned.

use std::sync::Arc;

use serde::Serialize;

use crate::application::{Actor, EngineError};
use crate::domain::foundation::QuestionId;
use crate::domain::moderation::{expert_assistance_prompt, session_summary_prompt, TranscriptRole};
use crate::domain::question::SenderRole;
use crate::ports::{
    AIProvider, AccountRepository, CompletionPurpose, CompletionRequest, QuestionRepository,
    ResponseRepository,
};

use super::assigned_question;

pub const SUGGESTION_FALLBACK: &str = "Unable to generate AI hints at this time.";
pub const SUMMARY_FALLBACK: &str = "Unable to generate session summary at this time.";

/// Generated text, or the fallback when generation failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistText {
    pub text: String,
    pub generated: bool,
}

impl AssistText {
    fn fallback(text: &str) -> Self {
        Self {
            text: text.to_string(),
            generated: false,
        }
    }
}

async fn generate(
    assistant: &dyn AIProvider,
    request: CompletionRequest,
    fallback: &str,
) -> AssistText {
    let purpose = request.purpose;
    match assistant.complete(request).await {
        Ok(reply) if !reply.content.trim().is_empty() => AssistText {
            text: reply.content.trim().to_string(),
            generated: true,
        },
        Ok(_) => {
            tracing::warn!(purpose = purpose.as_str(), "assistant returned empty text");
            AssistText::fallback(fallback)
        }
        Err(e) => {
            tracing::warn!(purpose = purpose.as_str(), error = %e, "assistant unavailable");
            AssistText::fallback(fallback)
        }
    }
}

#[derive(Debug, Clone)]
pub struct SuggestAnswerQuery {
    pub actor: Actor,
    pub question_id: QuestionId,
}

pub struct SuggestAnswerHandler {
    accounts: Arc<dyn AccountRepository>,
    questions: Arc<dyn QuestionRepository>,
    assistant: Arc<dyn AIProvider>,
}

impl SuggestAnswerHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        questions: Arc<dyn QuestionRepository>,
        assistant: Arc<dyn AIProvider>,
    ) -> Self {
        Self {
            accounts,
            questions,
            assistant,
        }
    }

    pub async fn handle(&self, query: SuggestAnswerQuery) -> Result<AssistText, EngineError> {
        let question = assigned_question(
            self.accounts.as_ref(),
            self.questions.as_ref(),
            query.actor,
            query.question_id,
        )
        .await?;

        let request = CompletionRequest::new(
            CompletionPurpose::ExpertAssistance,
            expert_assistance_prompt(&question.content),
        )
        .with_temperature(0.7)
        .with_max_tokens(300);

        Ok(generate(self.assistant.as_ref(), request, SUGGESTION_FALLBACK).await)
    }
}

#[derive(Debug, Clone)]
pub struct DraftSessionSummaryQuery {
    pub actor: Actor,
    pub question_id: QuestionId,
}

pub struct DraftSessionSummaryHandler {
    accounts: Arc<dyn AccountRepository>,
    questions: Arc<dyn QuestionRepository>,
    responses: Arc<dyn ResponseRepository>,
    assistant: Arc<dyn AIProvider>,
}

impl DraftSessionSummaryHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        questions: Arc<dyn QuestionRepository>,
        responses: Arc<dyn ResponseRepository>,
        assistant: Arc<dyn AIProvider>,
    ) -> Self {
        Self {
            accounts,
            questions,
            responses,
            assistant,
        }
    }

    pub async fn handle(&self, query: DraftSessionSummaryQuery) -> Result<AssistText, EngineError> {
        let question = assigned_question(
            self.accounts.as_ref(),
            self.questions.as_ref(),
            query.actor,
            query.question_id,
        )
        .await?;

        let transcript: Vec<(TranscriptRole, String)> = self
            .responses
            .find_by_question(&question.id)
            .await?
            .into_iter()
            .map(|r| {
                let role = match r.sender_role() {
                    SenderRole::Asker => TranscriptRole::Asker,
                    SenderRole::Expert => TranscriptRole::Expert,
                    SenderRole::Ai => TranscriptRole::Ai,
                };
                (role, r.content)
            })
            .collect();

        let request = CompletionRequest::new(
            CompletionPurpose::SessionSummary,
            session_summary_prompt(&question.content, &transcript),
        )
        .with_temperature(0.5)
        .with_max_tokens(500);

        Ok(generate(self.assistant.as_ref(), request, SUMMARY_FALLBACK).await)
    }
}
