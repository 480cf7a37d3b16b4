//! Text normalization, tokenization and the light suffix stemmer.

use std::collections::HashSet;

/// Suffixes stripped by [`stem`], tried in this order. The first match wins.
pub const STEM_SUFFIXES: [&str; 6] = ["ing", "ed", "er", "est", "ly", "s"];

/// Lowercase, drop everything that is neither a word character nor
/// whitespace, collapse whitespace runs to single spaces and trim.
///
/// Word characters are alphanumerics and `_`, so `"What's up?!"` becomes
/// `"whats up"`.
#[must_use]
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip the first matching suffix from `token`, but only when the token is
/// longer than `suffix length + 2` characters, so short words such as `"is"`
/// or `"bed"` survive intact.
#[must_use]
pub fn stem(token: &str) -> &str {
    let len = token.chars().count();
    for suffix in STEM_SUFFIXES {
        if token.ends_with(suffix) && len > suffix.len() + 2 {
            // Suffixes are ASCII, so this cut is on a char boundary.
            return &token[..token.len() - suffix.len()];
        }
    }
    token
}

/// Input text normalized once and reused across many comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedText {
    normalized: String,
}

impl PreparedText {
    /// Normalize `raw` for comparison.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self {
            normalized: normalize(raw),
        }
    }

    /// The normalized form.
    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Whitespace tokens of the normalized form, un-stemmed.
    #[must_use]
    pub fn tokens(&self) -> Vec<&str> {
        self.normalized.split_whitespace().collect()
    }

    /// Set of stemmed tokens.
    #[must_use]
    pub fn stems(&self) -> HashSet<&str> {
        self.normalized.split_whitespace().map(stem).collect()
    }

    /// Whether nothing survived normalization.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    /// Whether `phrase` (already normalized) occurs on token boundaries.
    #[must_use]
    pub fn contains_phrase(&self, phrase: &str) -> bool {
        if phrase.is_empty() {
            return false;
        }
        format!(" {} ", self.normalized).contains(&format!(" {phrase} "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_collapses_space() {
        assert_eq!(normalize("  Hello,   WORLD!! "), "hello world");
        assert_eq!(normalize("What's up?"), "whats up");
        assert_eq!(normalize("snake_case stays"), "snake_case stays");
        assert_eq!(normalize("?!..."), "");
    }

    #[test]
    fn stem_respects_minimum_length() {
        assert_eq!(stem("running"), "runn");
        assert_eq!(stem("jumped"), "jump");
        assert_eq!(stem("quickly"), "quick");
        assert_eq!(stem("cats"), "cat");
        // Too short to strip.
        assert_eq!(stem("is"), "is");
        assert_eq!(stem("bed"), "bed");
        assert_eq!(stem("sing"), "sing");
        assert_eq!(stem("bus"), "bus");
    }

    #[test]
    fn stem_uses_first_suffix_only() {
        assert_eq!(stem("players"), "player");
        assert_eq!(stem("greatest"), "great");
    }

    #[test]
    fn contains_phrase_respects_token_boundaries() {
        let text = PreparedText::new("Oh hi, what did I say before?");
        assert!(text.contains_phrase("what did i say"));
        assert!(text.contains_phrase("before"));
        assert!(text.contains_phrase("hi"));
        assert!(!PreparedText::new("this thing").contains_phrase("hi"));
        assert!(!text.contains_phrase(""));
    }
}
