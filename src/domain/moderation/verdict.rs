//! Safety verdicts and the closed vocabularies the classifier may answer with.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Kind of safety violation detected in a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationType {
    SelfHarm,
    Violence,
    Illegal,
    Harassment,
    Sexual,
    Drugs,
    Spam,
    None,
}

impl ViolationType {
    /// Every concrete violation the classifier is allowed to report.
    pub const REPORTABLE: [ViolationType; 7] = [
        ViolationType::SelfHarm,
        ViolationType::Violence,
        ViolationType::Illegal,
        ViolationType::Harassment,
        ViolationType::Sexual,
        ViolationType::Drugs,
        ViolationType::Spam,
    ];

    /// Wire label used by the classifier contract.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationType::SelfHarm => "SelfHarm",
            ViolationType::Violence => "Violence",
            ViolationType::Illegal => "Illegal",
            ViolationType::Harassment => "Harassment",
            ViolationType::Sexual => "Sexual",
            ViolationType::Drugs => "Drugs",
            ViolationType::Spam => "Spam",
            ViolationType::None => "None",
        }
    }

    /// Parses a reportable rejection type. `None` is not reportable.
    pub fn from_rejection_type(label: &str) -> Option<Self> {
        Self::REPORTABLE
            .into_iter()
            .find(|v| v.as_str() == label)
    }
}

impl fmt::Display for ViolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Topic category shared by questions, experts and classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    General,
    #[serde(rename = "Mental Health")]
    MentalHealth,
    Legal,
    Health,
    Career,
    Relationship,
    Finance,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::General,
        Category::MentalHealth,
        Category::Legal,
        Category::Health,
        Category::Career,
        Category::Relationship,
        Category::Finance,
    ];

    /// Display and wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "General",
            Category::MentalHealth => "Mental Health",
            Category::Legal => "Legal",
            Category::Health => "Health",
            Category::Career => "Career",
            Category::Relationship => "Relationship",
            Category::Finance => "Finance",
        }
    }

    /// Category whose experts also cover this one.
    ///
    /// Health experts take mental health questions when no mental health
    /// expert matches.
    pub fn routing_category(&self) -> Category {
        match self {
            Category::MentalHealth => Category::Health,
            other => *other,
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::General
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                ValidationError::invalid_format("category", format!("unknown category '{}'", wanted))
            })
    }
}

/// The classifier's normalized judgment of one piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub is_safe: bool,
    pub violation_type: ViolationType,
    pub reason: String,
    pub category: Category,
}

impl Verdict {
    /// A safe verdict.
    pub fn safe(category: Category, reason: impl Into<String>) -> Self {
        Self {
            is_safe: true,
            violation_type: ViolationType::None,
            reason: reason.into(),
            category,
        }
    }

    /// An unsafe verdict for a concrete violation.
    pub fn unsafe_content(
        violation_type: ViolationType,
        category: Category,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            is_safe: false,
            violation_type,
            reason: reason.into(),
            category,
        }
    }

    /// Verdict used when a reachable classifier answered outside the schema.
    pub fn lenient() -> Self {
        Self::safe(
            Category::General,
            "Classifier response failed validation; content accepted by default",
        )
    }

    /// Safety score stored alongside moderated content.
    pub fn safety_score(&self) -> f32 {
        if self.is_safe {
            1.0
        } else {
            0.0
        }
    }
}

/// Result of running text through the moderation gate.
///
/// `ServiceUnavailable` is deliberately not a verdict: it means nothing was
/// judged and must never count as a strike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationOutcome {
    Judged(Verdict),
    ServiceUnavailable { detail: String },
}

impl ModerationOutcome {
    /// Returns the verdict when one was reached.
    pub fn verdict(&self) -> Option<&Verdict> {
        match self {
            ModerationOutcome::Judged(v) => Some(v),
            ModerationOutcome::ServiceUnavailable { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_types_parse_from_closed_set() {
        assert_eq!(
            ViolationType::from_rejection_type("SelfHarm"),
            Some(ViolationType::SelfHarm)
        );
        assert_eq!(ViolationType::from_rejection_type("Spam"), Some(ViolationType::Spam));
        assert_eq!(ViolationType::from_rejection_type("HateSpeech"), None);
        assert_eq!(ViolationType::from_rejection_type("None"), None);
    }

    #[test]
    fn category_parses_labels_case_insensitively() {
        assert_eq!("Mental Health".parse::<Category>().unwrap(), Category::MentalHealth);
        assert_eq!("career".parse::<Category>().unwrap(), Category::Career);
        assert!("Astrology".parse::<Category>().is_err());
    }

    #[test]
    fn mental_health_routes_to_health() {
        assert_eq!(Category::MentalHealth.routing_category(), Category::Health);
        assert_eq!(Category::Career.routing_category(), Category::Career);
    }

    #[test]
    fn category_serializes_with_display_label() {
        let json = serde_json::to_string(&Category::MentalHealth).unwrap();
        assert_eq!(json, "\"Mental Health\"");
    }

    #[test]
    fn lenient_verdict_is_safe_and_general() {
        let v = Verdict::lenient();
        assert!(v.is_safe);
        assert_eq!(v.category, Category::General);
        assert_eq!(v.violation_type, ViolationType::None);
    }

    #[test]
    fn safety_score_reflects_judgment() {
        assert_eq!(Verdict::safe(Category::General, "ok").safety_score(), 1.0);
        let bad = Verdict::unsafe_content(ViolationType::Spam, Category::General, "spam");
        assert_eq!(bad.safety_score(), 0.0);
    }

    #[test]
    fn service_unavailable_has_no_verdict() {
        let outcome = ModerationOutcome::ServiceUnavailable {
            detail: "all backends failed".into(),
        };
        assert!(outcome.verdict().is_none());
    }
}
