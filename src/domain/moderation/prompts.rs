//! Prompt builders for the classifier and expert-assistance calls.

use super::verdict::{Category, ViolationType};

/// Conversation role as shown to the model when summarising a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptRole {
    Asker,
    Expert,
    Ai,
}

impl TranscriptRole {
    fn label(&self) -> &'static str {
        match self {
            TranscriptRole::Asker => "User",
            TranscriptRole::Expert => "Expert",
            TranscriptRole::Ai => "AI",
        }
    }
}

/// Builds the safety-classification prompt for a piece of user text.
pub fn moderation_prompt(text: &str) -> String {
    let violations = ViolationType::REPORTABLE
        .iter()
        .map(|v| v.as_str())
        .collect::<Vec<_>>()
        .join("\", \"");
    let categories = Category::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join("\", \"");

    format!(
        r#"You are the safety filter of an anonymous expert advice service.
Judge the full meaning of the text in context. Never flag on keywords alone.
Asking for help, describing feelings and ordinary questions are safe.

Mark the text unsafe only when its intent clearly falls in one of these groups:
- SelfHarm: explicit intent to hurt or kill oneself
- Violence: threats against others or promotion of violence
- Illegal: requests for or promotion of fraud, scams or other crimes
- Harassment: direct insults, abuse or bullying
- Sexual: explicit or non-consensual sexual content
- Drugs: obtaining, selling or misusing harmful substances
- Spam: advertising, repeated junk or unrelated promotional links

Also choose the single best topic category for the text.

Reply with one JSON object and nothing else:
{{"isSafe": boolean, "rejectionType": one of ["{violations}"] or null, "reason": short string, "category": one of ["{categories}"]}}

Text to analyse:
<<<
{text}
>>>"#
    )
}

/// Builds the prompt asking for a short suggested answer for an expert.
pub fn expert_assistance_prompt(question: &str) -> String {
    format!(
        "You assist a human expert answering an anonymous question.\n\
         Suggest a concise answer of two or three lines the expert could send directly.\n\
         No bullet points. Stay professional and helpful.\n\n\
         Question: \"{question}\""
    )
}

/// Builds the prompt asking for a third-person session summary.
pub fn session_summary_prompt(question: &str, transcript: &[(TranscriptRole, String)]) -> String {
    let conversation = transcript
        .iter()
        .map(|(role, content)| format!("{}: {}", role.label(), content))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Write a professional session summary for an expert's records.\n\n\
         Original question: \"{question}\"\n\n\
         Conversation:\n{conversation}\n\n\
         In three to five sentences, written in the third person, cover the main issue, \
         the advice given and the outcome or next steps."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moderation_prompt_lists_closed_sets_and_text() {
        let prompt = moderation_prompt("how do I ask for a raise?");

        assert!(prompt.contains("how do I ask for a raise?"));
        for v in ViolationType::REPORTABLE {
            assert!(prompt.contains(v.as_str()));
        }
        assert!(prompt.contains("Mental Health"));
        assert!(prompt.contains("\"isSafe\": boolean"));
    }

    #[test]
    fn summary_prompt_labels_each_turn() {
        let prompt = session_summary_prompt(
            "Is my contract valid?",
            &[
                (TranscriptRole::Asker, "I signed it yesterday".into()),
                (TranscriptRole::Expert, "It is binding".into()),
            ],
        );

        assert!(prompt.contains("User: I signed it yesterday"));
        assert!(prompt.contains("Expert: It is binding"));
        assert!(prompt.contains("Is my contract valid?"));
    }
}
