//! User facts: what the responder remembers about the person it talks to.
//!
//! Facts are extracted from each input by small declarative matchers
//! (pattern, deny-list, validator) tried in priority order, first match wins.
//! Two sets exist for names:
//!
//! - a **lenient** set that scans anywhere in the input ("oh btw I'm Sam"),
//! - a **strict** set that only accepts an input which is *nothing but* an
//!   introduction ("hi, my name is Sam"), used to short-circuit the reply.
//!
//! Bare "I'm X" patterns also reject sentiment lexicon words and "-ing"
//! forms, so "I'm dead" or "I'm studying" never overwrite a real name.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sentiment::Lexicon;

/// Fact key for the user's name.
pub const NAME: &str = "name";
/// Fact key for things the user likes.
pub const LIKES: &str = "likes";
/// Fact key for things the user dislikes.
pub const DISLIKES: &str = "dislikes";

// ---------------------------------------------------------------------------
// Fact storage
// ---------------------------------------------------------------------------

/// A remembered value: a scalar or an accumulating list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    /// Overwritten on merge.
    Text(String),
    /// Appended to on merge.
    List(Vec<String>),
}

/// Mapping from fact key to value, accumulated over a conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserFacts(BTreeMap<String, FactValue>);

impl UserFacts {
    /// No facts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fact keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Look up a fact.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FactValue> {
        self.0.get(key)
    }

    /// The user's name, if known.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self.0.get(NAME) {
            Some(FactValue::Text(name)) => Some(name),
            _ => None,
        }
    }

    /// A list fact, empty if absent or scalar.
    #[must_use]
    pub fn list(&self, key: &str) -> &[String] {
        match self.0.get(key) {
            Some(FactValue::List(items)) => items,
            _ => &[],
        }
    }

    /// Set a scalar fact, replacing any previous value.
    pub fn set_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), FactValue::Text(value.into()));
    }

    /// Append to a list fact, creating it if needed. A scalar under the same
    /// key is replaced by a one-element list.
    pub fn push(&mut self, key: impl Into<String>, item: impl Into<String>) {
        let item = item.into();
        match self.0.entry(key.into()) {
            std::collections::btree_map::Entry::Occupied(mut e) => match e.get_mut() {
                FactValue::List(items) => items.push(item),
                other @ FactValue::Text(_) => *other = FactValue::List(vec![item]),
            },
            std::collections::btree_map::Entry::Vacant(e) => {
                e.insert(FactValue::List(vec![item]));
            }
        }
    }

    /// Merge `update` key by key: new keys are added, scalars overwrite,
    /// list-into-list appends.
    pub fn merge(&mut self, update: &UserFacts) {
        for (key, value) in &update.0 {
            match (self.0.get_mut(key), value) {
                (Some(FactValue::List(existing)), FactValue::List(new)) => {
                    existing.extend(new.iter().cloned());
                }
                _ => {
                    self.0.insert(key.clone(), value.clone());
                }
            }
        }
    }

    /// Iterate facts in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FactValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// ---------------------------------------------------------------------------
// Declarative matchers
// ---------------------------------------------------------------------------

/// One extraction rule: a regex whose first capture group is the value,
/// rejected when it is deny-listed or fails the validator.
#[derive(Debug, Clone)]
pub struct FactMatcher {
    label: &'static str,
    pattern: Regex,
    deny: &'static [&'static str],
    validator: fn(&str) -> bool,
    state_words: Option<Arc<BTreeSet<String>>>,
}

impl FactMatcher {
    /// Compile a matcher. `pattern` runs against lowercased input.
    ///
    /// # Errors
    /// Returns [`crate::ParleyError::Pattern`] if the regex is invalid.
    pub fn new(
        label: &'static str,
        pattern: &str,
        deny: &'static [&'static str],
        validator: fn(&str) -> bool,
    ) -> Result<Self> {
        Ok(Self {
            label,
            pattern: Regex::new(pattern)?,
            deny,
            validator,
            state_words: None,
        })
    }

    /// Also reject captures found in `words` or ending in "ing".
    #[must_use]
    pub fn rejecting_state_words(mut self, words: &Arc<BTreeSet<String>>) -> Self {
        self.state_words = Some(Arc::clone(words));
        self
    }

    /// Name used in logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// The accepted capture, if the pattern matches.
    #[must_use]
    pub fn capture(&self, lowered: &str) -> Option<String> {
        let caps = self.pattern.captures(lowered)?;
        let value = caps.get(1)?.as_str().trim();
        if self.deny.contains(&value) || !(self.validator)(value) {
            return None;
        }
        if let Some(words) = &self.state_words {
            if words.contains(value) || value.ends_with("ing") {
                return None;
            }
        }
        Some(value.to_string())
    }
}

/// First accepted capture across `matchers`, in order.
#[must_use]
pub fn first_capture(matchers: &[FactMatcher], lowered: &str) -> Option<String> {
    matchers.iter().find_map(|m| m.capture(lowered))
}

fn looks_like_name(value: &str) -> bool {
    value.chars().count() >= 2 && value.chars().all(char::is_alphabetic)
}

fn looks_like_preference(value: &str) -> bool {
    !value.is_empty() && value.chars().count() <= 60
}

/// Words that follow "I'm" without being names.
const NAME_DENY: &[&str] = &[
    "a", "about", "afraid", "alone", "alright", "also", "always", "an", "angry", "at", "awake",
    "back", "bad", "bored", "broke", "busy", "cold", "confused", "cool", "curious", "doing", "done", "down",
    "early", "excited", "feeling", "fine", "free", "from", "glad", "going", "gonna", "good",
    "great", "happy", "here", "home", "hot", "hungry", "in", "interested", "into", "just", "kinda",
    "late", "learning", "like", "lonely", "looking", "lost", "mad", "never", "new", "not", "off", "ok",
    "okay", "on", "only", "out", "pretty", "ready", "really", "sad", "scared", "sick", "sleepy",
    "so", "sorry", "starving", "still", "stressed", "stuck", "sure", "the", "thinking", "tired", "to", "trying", "up",
    "upset", "very", "well", "with", "working", "worried",
];

/// Stricter list for the whole-input introduction check.
const INTRO_DENY: &[&str] = &[
    "a", "about", "afraid", "alone", "alright", "also", "always", "an", "angry", "at", "awake",
    "back", "bad", "bored", "bot", "broke", "busy", "cold", "confused", "cool", "curious", "doing", "done", "down",
    "early", "excited", "feeling", "fine", "free", "from", "glad", "going", "gonna", "good",
    "great", "happy", "hello", "here", "hey", "hi", "home", "hot", "hungry", "in", "interested",
    "into", "it", "just", "kinda", "late", "learning", "like", "lonely", "looking", "lost", "mad",
    "me",
    "never", "new", "nobody", "not", "off", "ok", "okay", "on", "only", "out", "pretty", "ready",
    "really", "sad", "scared", "sick", "sleepy", "so", "somebody", "someone", "sorry", "starving",
    "still", "stressed", "stuck", "sure", "that", "the", "there", "thinking", "this", "tired", "to", "trying", "up",
    "upset", "very", "well", "with", "working", "worried", "you",
];

const PREFERENCE_DENY: &[&str] = &["it", "that", "this", "them", "to", "you"];

const GREETING_PREFIX: &str = r"(?:(?:hi|hello|hey|yo|hiya|howdy)(?: there)?[\s,!.]+)?";

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

/// The standard set of fact matchers.
#[derive(Debug, Clone)]
pub struct FactExtractor {
    names: Vec<FactMatcher>,
    introductions: Vec<FactMatcher>,
    likes: Vec<FactMatcher>,
    dislikes: Vec<FactMatcher>,
}

impl FactExtractor {
    /// Build the standard matchers against the built-in lexicon.
    ///
    /// # Errors
    /// Returns [`crate::ParleyError::Pattern`] if a pattern fails to compile.
    pub fn standard() -> Result<Self> {
        Self::new(&Lexicon::default())
    }

    /// Build the standard matchers. Single-word terms of `lexicon` are never
    /// taken as a name after a bare "I'm" or "I am".
    ///
    /// # Errors
    /// Returns [`crate::ParleyError::Pattern`] if a pattern fails to compile.
    pub fn new(lexicon: &Lexicon) -> Result<Self> {
        let state_words: Arc<BTreeSet<String>> = Arc::new(
            lexicon
                .terms
                .keys()
                .map(|term| term.to_lowercase())
                .filter(|term| !term.contains(char::is_whitespace))
                .collect(),
        );

        let names = vec![
            FactMatcher::new("my-name-is", r"\bmy name(?: is|'s) (\p{L}+)", NAME_DENY, looks_like_name)?,
            FactMatcher::new("call-me", r"\bcall me (\p{L}+)", NAME_DENY, looks_like_name)?,
            FactMatcher::new("i-am", r"\bi am (\p{L}+)", NAME_DENY, looks_like_name)?
                .rejecting_state_words(&state_words),
            FactMatcher::new("im", r"\bi'?m (\p{L}+)", NAME_DENY, looks_like_name)?
                .rejecting_state_words(&state_words),
        ];

        let introductions = vec![
            FactMatcher::new(
                "intro-my-name-is",
                &format!(r"^{GREETING_PREFIX}my name(?: is|'s)\s+(\p{{L}}+)[\s.!]*$"),
                INTRO_DENY,
                looks_like_name,
            )?,
            FactMatcher::new(
                "intro-call-me",
                &format!(r"^{GREETING_PREFIX}(?:you can )?call me\s+(\p{{L}}+)[\s.!]*$"),
                INTRO_DENY,
                looks_like_name,
            )?,
            FactMatcher::new(
                "intro-i-am",
                &format!(r"^{GREETING_PREFIX}i(?: am|'m|m)\s+(\p{{L}}+)[\s.!]*$"),
                INTRO_DENY,
                looks_like_name,
            )?
            .rejecting_state_words(&state_words),
        ];

        let likes = vec![FactMatcher::new(
            "i-like",
            r"\bi (?:really |also |do )?(?:like|love) ([^.!?,;]+)",
            PREFERENCE_DENY,
            looks_like_preference,
        )?];

        let dislikes = vec![FactMatcher::new(
            "i-hate",
            r"\bi (?:really |also )?(?:hate|dislike|don'?t like|do not like) ([^.!?,;]+)",
            PREFERENCE_DENY,
            looks_like_preference,
        )?];

        Ok(Self {
            names,
            introductions,
            likes,
            dislikes,
        })
    }

    /// Scan `text` for facts. Returns an empty update when nothing is found.
    #[must_use]
    pub fn extract(&self, text: &str) -> UserFacts {
        let lowered = lower(text);
        let mut update = UserFacts::new();

        if let Some(name) = first_capture(&self.names, &lowered) {
            update.set_text(NAME, capitalize(&name));
        }
        if let Some(liked) = first_capture(&self.likes, &lowered) {
            update.push(LIKES, liked);
        }
        if let Some(disliked) = first_capture(&self.dislikes, &lowered) {
            update.push(DISLIKES, disliked);
        }
        update
    }

    /// The introduced name, if `text` is nothing but a self-introduction.
    #[must_use]
    pub fn introduction(&self, text: &str) -> Option<String> {
        first_capture(&self.introductions, &lower(text)).map(|name| capitalize(&name))
    }
}

fn lower(text: &str) -> String {
    text.trim().to_lowercase().replace('\u{2019}', "'")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> FactExtractor {
        FactExtractor::standard().expect("patterns compile")
    }

    #[test]
    fn extracts_names_in_priority_order() {
        let ex = extractor();
        assert_eq!(ex.extract("My name is alex").name(), Some("Alex"));
        assert_eq!(ex.extract("hey, call me Sam!").name(), Some("Sam"));
        assert_eq!(ex.extract("I am jordan").name(), Some("Jordan"));
        assert_eq!(ex.extract("oh btw I’m riley").name(), Some("Riley"));
        // "my name is" outranks "i'm".
        assert_eq!(ex.extract("I'm told my name is Kai").name(), Some("Kai"));
    }

    #[test]
    fn rejects_deny_listed_and_short_captures() {
        let ex = extractor();
        assert!(ex.extract("I'm tired").name().is_none());
        assert!(ex.extract("i am fine thanks").name().is_none());
        assert!(ex.extract("I'm going home").name().is_none());
        assert!(ex.extract("im x").name().is_none());
    }

    #[test]
    fn denied_capture_falls_through_to_next_matcher() {
        // "i am" captures "so", which is denied; "i'm" still matches.
        let ex = extractor();
        assert_eq!(ex.extract("i am so done, i'm Robin by the way").name(), Some("Robin"));
    }

    #[test]
    fn accented_names_are_kept_whole() {
        let ex = extractor();
        assert_eq!(ex.extract("My name is José").name(), Some("José"));
        assert_eq!(ex.extract("call me Zoë please").name(), Some("Zoë"));
        assert_eq!(ex.introduction("hi, I'm Ñuño").as_deref(), Some("Ñuño"));
        assert_eq!(ex.introduction("My name is José").as_deref(), Some("José"));
    }

    #[test]
    fn mood_words_are_not_names_after_im() {
        let ex = extractor();
        for text in ["I'm dead", "I'm thriving", "I'm lonely", "I'm studying", "i am salty"] {
            assert!(ex.extract(text).name().is_none(), "{text}");
            assert!(ex.introduction(text).is_none(), "{text}");
        }
        // An explicit introduction is still trusted.
        assert_eq!(ex.extract("my name is Sterling").name(), Some("Sterling"));
    }

    #[test]
    fn swim_does_not_read_as_im() {
        assert!(extractor().extract("I swim daily").name().is_none());
    }

    #[test]
    fn extracts_preferences_as_lists() {
        let ex = extractor();
        let facts = ex.extract("I like pizza with pineapple. Also other stuff");
        assert_eq!(facts.list(LIKES), ["pizza with pineapple"]);

        let facts = ex.extract("I don't like mondays");
        assert_eq!(facts.list(DISLIKES), ["mondays"]);
        assert!(facts.list(LIKES).is_empty());

        let facts = ex.extract("i hate spiders, seriously");
        assert_eq!(facts.list(DISLIKES), ["spiders"]);

        assert!(ex.extract("I like it").is_empty());
    }

    #[test]
    fn introduction_is_whole_input_only() {
        let ex = extractor();
        assert_eq!(ex.introduction("My name is Alex").as_deref(), Some("Alex"));
        assert_eq!(ex.introduction("hi! I'm alex.").as_deref(), Some("Alex"));
        assert_eq!(ex.introduction("Hello there, call me Sam").as_deref(), Some("Sam"));
        assert!(ex.introduction("I'm tired").is_none());
        assert!(ex.introduction("I'm alex and I like cats").is_none());
        assert!(ex.introduction("what is my name").is_none());
    }

    #[test]
    fn merge_overwrites_scalars_and_appends_lists() {
        let mut facts = UserFacts::new();
        facts.set_text(NAME, "Alex");
        facts.push(LIKES, "cats");

        let mut update = UserFacts::new();
        update.set_text(NAME, "Sam");
        update.push(LIKES, "dogs");
        update.push(DISLIKES, "rain");
        facts.merge(&update);

        assert_eq!(facts.name(), Some("Sam"));
        assert_eq!(facts.list(LIKES), ["cats", "dogs"]);
        assert_eq!(facts.list(DISLIKES), ["rain"]);
        assert_eq!(facts.len(), 3);
    }

    #[test]
    fn facts_serialize_as_plain_mapping() {
        let mut facts = UserFacts::new();
        facts.set_text(NAME, "Alex");
        facts.push(LIKES, "cats");
        let json = serde_json::to_string(&facts).expect("serialize");
        assert_eq!(json, r#"{"likes":["cats"],"name":"Alex"}"#);
        let back: UserFacts = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, facts);
    }
}
