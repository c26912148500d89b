//! Flag records appended to an account's violation history.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::moderation::ViolationType;

/// What a flag record was raised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlagKind {
    SelfHarm,
    Violence,
    Illegal,
    Harassment,
    Sexual,
    Drugs,
    Spam,

    /// Unsafe verdict that carried no specific violation type.
    #[serde(rename = "content_violation")]
    ContentViolation,

    /// Terminal suspension applied by an administrator.
    #[serde(rename = "admin_ban")]
    AdminBan,
}

impl FlagKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagKind::SelfHarm => "SelfHarm",
            FlagKind::Violence => "Violence",
            FlagKind::Illegal => "Illegal",
            FlagKind::Harassment => "Harassment",
            FlagKind::Sexual => "Sexual",
            FlagKind::Drugs => "Drugs",
            FlagKind::Spam => "Spam",
            FlagKind::ContentViolation => "content_violation",
            FlagKind::AdminBan => "admin_ban",
        }
    }
}

impl From<ViolationType> for FlagKind {
    fn from(v: ViolationType) -> Self {
        match v {
            ViolationType::SelfHarm => FlagKind::SelfHarm,
            ViolationType::Violence => FlagKind::Violence,
            ViolationType::Illegal => FlagKind::Illegal,
            ViolationType::Harassment => FlagKind::Harassment,
            ViolationType::Sexual => FlagKind::Sexual,
            ViolationType::Drugs => FlagKind::Drugs,
            ViolationType::Spam => FlagKind::Spam,
            ViolationType::None => FlagKind::ContentViolation,
        }
    }
}

/// One immutable entry in an account's violation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagRecord {
    pub timestamp: Timestamp,
    #[serde(rename = "type")]
    pub kind: FlagKind,
    pub reason: String,
    pub excerpt: String,
}

impl FlagRecord {
    pub fn new(
        kind: FlagKind,
        reason: impl Into<String>,
        excerpt: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            timestamp,
            kind,
            reason: reason.into(),
            excerpt: excerpt.into(),
        }
    }

    pub fn is_admin_ban(&self) -> bool {
        self.kind == FlagKind::AdminBan
    }
}

/// Truncates content to at most `max_chars` characters on a char boundary.
pub fn excerpt(content: &str, max_chars: usize) -> String {
    content.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("héllo wörld", 4), "héll");
        assert_eq!(excerpt("short", 100), "short");
    }

    #[test]
    fn admin_ban_serializes_with_distinguished_tag() {
        let record = FlagRecord::new(FlagKind::AdminBan, "abuse", "", Timestamp::now());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "admin_ban");
        assert!(record.is_admin_ban());
    }

    #[test]
    fn violation_none_maps_to_generic_kind() {
        assert_eq!(FlagKind::from(ViolationType::None), FlagKind::ContentViolation);
        assert_eq!(FlagKind::from(ViolationType::Drugs), FlagKind::Drugs);
    }
}
