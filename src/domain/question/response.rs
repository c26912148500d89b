//! Responses posted in a question's conversation.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AccountId, QuestionId, ResponseId, Timestamp};
use crate::domain::moderation::Verdict;

/// Who sent a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderRole {
    Asker,
    Expert,
    Ai,
}

impl SenderRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SenderRole::Asker => "asker",
            SenderRole::Expert => "expert",
            SenderRole::Ai => "ai",
        }
    }
}

/// Author of a response: an asker, an expert, or nobody for AI text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "snake_case")]
pub enum ResponseAuthor {
    Asker(AccountId),
    Expert(AccountId),
    Ai,
}

impl ResponseAuthor {
    pub fn sender_role(&self) -> SenderRole {
        match self {
            ResponseAuthor::Asker(_) => SenderRole::Asker,
            ResponseAuthor::Expert(_) => SenderRole::Expert,
            ResponseAuthor::Ai => SenderRole::Ai,
        }
    }

    pub fn account_id(&self) -> Option<AccountId> {
        match self {
            ResponseAuthor::Asker(id) | ResponseAuthor::Expert(id) => Some(*id),
            ResponseAuthor::Ai => None,
        }
    }
}

/// One message in a question's conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub id: ResponseId,
    pub question_id: QuestionId,
    pub content: String,
    pub author: ResponseAuthor,
    pub moderation_score: Option<f32>,
    pub moderation_flags: Option<Verdict>,
    pub is_appropriate: bool,
    pub created_at: Timestamp,
}

impl Response {
    /// Creates an accepted reply. `verdict` is `None` for unscreened content.
    pub fn accepted(
        question_id: QuestionId,
        author: ResponseAuthor,
        content: String,
        verdict: Option<Verdict>,
    ) -> Self {
        Self {
            id: ResponseId::new(),
            question_id,
            content,
            author,
            moderation_score: verdict.as_ref().map(Verdict::safety_score),
            is_appropriate: verdict.as_ref().map_or(true, |v| v.is_safe),
            moderation_flags: verdict,
            created_at: Timestamp::now(),
        }
    }

    pub fn sender_role(&self) -> SenderRole {
        self.author.sender_role()
    }

    pub fn is_ai_generated(&self) -> bool {
        self.author == ResponseAuthor::Ai
    }

    pub fn is_authored_by(&self, account: AccountId) -> bool {
        self.author.account_id() == Some(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::moderation::Category;

    #[test]
    fn screened_reply_carries_moderation_data() {
        let expert = AccountId::new();
        let r = Response::accepted(
            QuestionId::new(),
            ResponseAuthor::Expert(expert),
            "Try a counter-offer".into(),
            Some(Verdict::safe(Category::Career, "fine")),
        );
        assert_eq!(r.sender_role(), SenderRole::Expert);
        assert_eq!(r.moderation_score, Some(1.0));
        assert!(r.is_appropriate);
        assert!(r.is_authored_by(expert));
        assert!(!r.is_ai_generated());
    }

    #[test]
    fn unscreened_reply_has_no_score() {
        let r = Response::accepted(
            QuestionId::new(),
            ResponseAuthor::Asker(AccountId::new()),
            "thanks".into(),
            None,
        );
        assert!(r.moderation_score.is_none());
        assert!(r.moderation_flags.is_none());
        assert!(r.is_appropriate);
    }

    #[test]
    fn ai_reply_has_no_author_account() {
        let r = Response::accepted(QuestionId::new(), ResponseAuthor::Ai, "hint".into(), None);
        assert!(r.is_ai_generated());
        assert!(!r.is_authored_by(AccountId::new()));
    }
}
