//! ModerationGate - safety classification of user text.
//!
//! Wraps the classifier backend chain behind a single `classify` call. The
//! outcome separates "content judged" from "nothing could judge it": only the
//! former may ever count as a strike.

use std::sync::Arc;

use crate::domain::moderation::{
    moderation_prompt, parse_classifier_reply, ModerationOutcome, Verdict,
};
use crate::ports::{AIProvider, CompletionPurpose, CompletionRequest};

use super::EngineError;

const CLASSIFIER_MAX_TOKENS: u32 = 256;

pub struct ModerationGate {
    classifier: Arc<dyn AIProvider>,
}

impl ModerationGate {
    pub fn new(classifier: Arc<dyn AIProvider>) -> Self {
        Self { classifier }
    }

    /// Classifies `text`. Never fails; unavailability is an outcome.
    pub async fn classify(&self, text: &str) -> ModerationOutcome {
        let request = CompletionRequest::new(CompletionPurpose::Moderation, moderation_prompt(text))
            .with_temperature(0.0)
            .with_max_tokens(CLASSIFIER_MAX_TOKENS)
            .expecting_json();
        let trace_id = request.trace_id.clone();

        let reply = match self.classifier.complete(request).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(trace_id = %trace_id, error = %e, "content classifier unavailable");
                return ModerationOutcome::ServiceUnavailable {
                    detail: e.to_string(),
                };
            }
        };

        match parse_classifier_reply(&reply.content) {
            Ok(verdict) => {
                tracing::debug!(
                    trace_id = %trace_id,
                    model = %reply.model,
                    is_safe = verdict.is_safe,
                    violation = verdict.violation_type.as_str(),
                    category = verdict.category.as_str(),
                    "content classified"
                );
                ModerationOutcome::Judged(verdict)
            }
            Err(e) => {
                tracing::error!(trace_id = %trace_id, error = %e, "classifier reply unusable");
                ModerationOutcome::ServiceUnavailable {
                    detail: e.to_string(),
                }
            }
        }
    }

    /// Classifies `text`, turning unavailability into an error.
    pub async fn screen(&self, text: &str) -> Result<Verdict, EngineError> {
        match self.classify(text).await {
            ModerationOutcome::Judged(verdict) => Ok(verdict),
            ModerationOutcome::ServiceUnavailable { detail } => {
                Err(EngineError::ServiceUnavailable(detail))
            }
        }
    }
}
