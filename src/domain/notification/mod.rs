//! Notifications announced to connected clients after visible state changes.

use serde::Serialize;

use crate::domain::foundation::{AccountId, QuestionId, ResponseId};
use crate::domain::moderation::Category;
use crate::domain::question::{QuestionStatus, Rating, Response};

/// Event broadcast on the notification bus.
///
/// Serializes as `{"event": "<name>", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum Notification {
    #[serde(rename_all = "camelCase")]
    NewQuestion {
        question_id: QuestionId,
        category: Category,
        expert_id: Option<AccountId>,
    },

    #[serde(rename_all = "camelCase")]
    NewMessage {
        question_id: QuestionId,
        response: Response,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<QuestionStatus>,
    },

    #[serde(rename_all = "camelCase")]
    MessageDeleted {
        question_id: QuestionId,
        response_id: ResponseId,
    },

    #[serde(rename_all = "camelCase")]
    QuestionDeleted { question_id: QuestionId },

    #[serde(rename_all = "camelCase")]
    RatingUpdated {
        question_id: QuestionId,
        rating: Rating,
        feedback: Option<String>,
    },

    #[serde(rename_all = "camelCase")]
    ExpertStatusChanged { expert_id: AccountId, is_online: bool },
}

impl Notification {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Notification::NewQuestion { .. } => "new_question",
            Notification::NewMessage { .. } => "new_message",
            Notification::MessageDeleted { .. } => "message_deleted",
            Notification::QuestionDeleted { .. } => "question_deleted",
            Notification::RatingUpdated { .. } => "rating_updated",
            Notification::ExpertStatusChanged { .. } => "expert_status_changed",
        }
    }

    /// Question the event concerns, if any.
    pub fn question_id(&self) -> Option<QuestionId> {
        match self {
            Notification::NewQuestion { question_id, .. }
            | Notification::NewMessage { question_id, .. }
            | Notification::MessageDeleted { question_id, .. }
            | Notification::QuestionDeleted { question_id }
            | Notification::RatingUpdated { question_id, .. } => Some(*question_id),
            Notification::ExpertStatusChanged { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_event_name_and_camel_case_payload() {
        let question_id = QuestionId::new();
        let n = Notification::NewQuestion {
            question_id,
            category: Category::Career,
            expert_id: None,
        };
        let json = serde_json::to_value(&n).unwrap();

        assert_eq!(json["event"], "new_question");
        assert_eq!(json["payload"]["questionId"], question_id.to_string());
        assert_eq!(json["payload"]["category"], "Career");
        assert!(json["payload"]["expertId"].is_null());
    }

    #[test]
    fn names_match_serialized_tags() {
        let n = Notification::ExpertStatusChanged {
            expert_id: AccountId::new(),
            is_online: true,
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["event"], n.name());
        assert_eq!(json["payload"]["isOnline"], true);
        assert!(n.question_id().is_none());
    }
}
