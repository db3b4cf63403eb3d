//! User actions and their canned instruction prompts.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — tweaking a canned instruction requires
//!    editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the instruction each action
//!    produces without spinning up a real model.
//!
//! An [`Action`] is an explicit request value dispatched once per user
//! action. This replaces the flag-polling style of UI layers ("was this
//! button pressed?") with a single tagged value the orchestrator matches on.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Canned instruction: list the topics on the page with study references.
pub const EXPLORE_TOPICS_PROMPT: &str = "List out the topics in the image and write one line \
descriptions for them in bullet format. After completing, provide study material websites for \
reference for the listed topics";

/// Canned instruction: turn the page into a short self-test quiz.
pub const GENERATE_QUESTIONNAIRE_PROMPT: &str = "Make a short quiz out of the image along with \
their answers including short explanation and formulas";

/// Canned instruction: formulas only, no prose.
pub const COLLECT_FORMULAS_PROMPT: &str = "List out only the formulas in the image without any \
explanation or any description";

/// Canned instruction: faithful transcription of the page.
pub const EXTRACT_TEXT_PROMPT: &str = "Extract all text content from the image exactly as \
written, preserving the reading order";

/// What the user asked the model to do with each page.
///
/// Exactly one action is dispatched per query; the orchestrator sends the
/// same instruction to every page of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Free-text instruction. May be empty — no client-side validation
    /// blocks an empty instruction from reaching the model.
    Ask(String),
    /// Transcribe the page verbatim.
    ExtractText,
    /// List topics with one-line descriptions and study references.
    ExploreTopics,
    /// Produce a short quiz with answers and explanations.
    GenerateQuestionnaire,
    /// List only the formulas on the page.
    CollectFormulas,
}

impl Action {
    /// The instruction string sent to the model for this action.
    pub fn instruction(&self) -> Cow<'_, str> {
        match self {
            Action::Ask(text) => Cow::Borrowed(text.as_str()),
            Action::ExtractText => Cow::Borrowed(EXTRACT_TEXT_PROMPT),
            Action::ExploreTopics => Cow::Borrowed(EXPLORE_TOPICS_PROMPT),
            Action::GenerateQuestionnaire => Cow::Borrowed(GENERATE_QUESTIONNAIRE_PROMPT),
            Action::CollectFormulas => Cow::Borrowed(COLLECT_FORMULAS_PROMPT),
        }
    }

    /// Short label for log lines and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            Action::Ask(_) => "ask",
            Action::ExtractText => "extract-text",
            Action::ExploreTopics => "explore-topics",
            Action::GenerateQuestionnaire => "generate-questionnaire",
            Action::CollectFormulas => "collect-formulas",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_passes_text_through_verbatim() {
        let action = Action::Ask("What is on this page?".into());
        assert_eq!(action.instruction(), "What is on this page?");
    }

    #[test]
    fn empty_ask_is_allowed() {
        let action = Action::Ask(String::new());
        assert_eq!(action.instruction(), "");
    }

    #[test]
    fn canned_actions_map_to_their_prompts() {
        assert_eq!(Action::ExploreTopics.instruction(), EXPLORE_TOPICS_PROMPT);
        assert_eq!(
            Action::GenerateQuestionnaire.instruction(),
            GENERATE_QUESTIONNAIRE_PROMPT
        );
        assert_eq!(Action::CollectFormulas.instruction(), COLLECT_FORMULAS_PROMPT);
        assert_eq!(Action::ExtractText.instruction(), EXTRACT_TEXT_PROMPT);
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(Action::Ask("x".into()).label(), "ask");
        assert_eq!(Action::CollectFormulas.label(), "collect-formulas");
    }

    #[test]
    fn action_serde_round_trip() {
        let action = Action::Ask("summarise".into());
        let json = serde_json::to_string(&action).unwrap();
        let back: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(back, action);
    }
}
