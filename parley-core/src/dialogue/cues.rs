//! Cue phrases that steer context enrichment.
//!
//! Cues are written in normalized form (lowercase, no punctuation) and
//! matched on token boundaries, so "hi" does not fire inside "this".

use crate::similarity::PreparedText;

/// Direct questions about the user's own name.
pub const NAME_QUESTIONS: &[&str] = &[
    "what is my name",
    "whats my name",
    "do you know my name",
    "who am i",
    "remember my name",
];

/// Greetings that earn a personalized prefix once a name is known.
pub const GREETINGS: &[&str] = &["hello", "hi", "hey", "howdy", "yo"];

/// "How are you"-style openers.
pub const HOW_ARE_YOU: &[&str] = &["how are you", "whats up", "hows it going", "whats good"];

/// Requests to repeat something said earlier.
pub const RECALL: &[&str] = &[
    "what did i say",
    "what did i just say",
    "what was i talking about",
    "before",
    "earlier",
];

/// A cue category found in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// See [`NAME_QUESTIONS`].
    NameQuestion,
    /// See [`GREETINGS`].
    Greeting,
    /// See [`HOW_ARE_YOU`].
    HowAreYou,
    /// See [`RECALL`].
    Recall,
}

impl Cue {
    /// Phrases belonging to this cue.
    #[must_use]
    pub fn phrases(self) -> &'static [&'static str] {
        match self {
            Self::NameQuestion => NAME_QUESTIONS,
            Self::Greeting => GREETINGS,
            Self::HowAreYou => HOW_ARE_YOU,
            Self::Recall => RECALL,
        }
    }

    /// Whether any phrase of this cue occurs in `input`.
    #[must_use]
    pub fn present_in(self, input: &PreparedText) -> bool {
        self.phrases().iter().any(|p| input.contains_phrase(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has(cue: Cue, text: &str) -> bool {
        cue.present_in(&PreparedText::new(text))
    }

    #[test]
    fn name_questions_ignore_punctuation() {
        assert!(has(Cue::NameQuestion, "What's my name?"));
        assert!(has(Cue::NameQuestion, "Do you know my name??"));
        assert!(!has(Cue::NameQuestion, "what is your name"));
    }

    #[test]
    fn greetings_match_whole_words_only() {
        assert!(has(Cue::Greeting, "hi there"));
        assert!(has(Cue::Greeting, "Hello!"));
        assert!(!has(Cue::Greeting, "this is nothing"));
    }

    #[test]
    fn recall_cues() {
        assert!(has(Cue::Recall, "what did I just say?"));
        assert!(has(Cue::Recall, "like I said earlier"));
        assert!(!has(Cue::Recall, "tell me something"));
        assert!(has(Cue::HowAreYou, "hey, how's it going"));
    }
}
