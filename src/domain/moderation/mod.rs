//! Moderation vocabulary: verdicts, categories, classifier reply parsing and prompts.

mod parse;
mod prompts;
mod verdict;

pub use parse::{
    decode_json_object, parse_classifier_reply, verdict_from_value, ClassifierReplyError,
};
pub use prompts::{
    expert_assistance_prompt, moderation_prompt, session_summary_prompt, TranscriptRole,
};
pub use verdict::{Category, ModerationOutcome, Verdict, ViolationType};
