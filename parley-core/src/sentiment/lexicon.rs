//! Sentiment lexicon tables.
//!
//! A [`Lexicon`] is plain data: it can be built in code, deserialized from
//! TOML/JSON, or taken from [`Lexicon::default`]. The scorer compiles it once
//! at construction and never mutates it.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::similarity::normalize;

/// Weighted vocabulary, symbol weights and modifier words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lexicon {
    /// Term (single word or short phrase) → signed weight, roughly `[-1, 1]`.
    #[serde(default)]
    pub terms: BTreeMap<String, f32>,
    /// Individual glyphs (usually emoji) → signed weight.
    #[serde(default)]
    pub symbols: BTreeMap<String, f32>,
    /// Words that flip and dampen a following term.
    #[serde(default)]
    pub negations: BTreeSet<String>,
    /// Word → multiplier applied to the term right after it.
    #[serde(default)]
    pub intensifiers: BTreeMap<String, f32>,
}

impl Lexicon {
    /// A lexicon with no entries at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            terms: BTreeMap::new(),
            symbols: BTreeMap::new(),
            negations: BTreeSet::new(),
            intensifiers: BTreeMap::new(),
        }
    }

    /// Add or replace a weighted term.
    #[must_use]
    pub fn with_term(mut self, term: impl Into<String>, weight: f32) -> Self {
        self.terms.insert(term.into(), weight);
        self
    }

    /// Add or replace a weighted symbol.
    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>, weight: f32) -> Self {
        self.symbols.insert(symbol.into(), weight);
        self
    }

    /// Add a negation word.
    #[must_use]
    pub fn with_negation(mut self, word: impl Into<String>) -> Self {
        self.negations.insert(word.into());
        self
    }

    /// Add or replace an intensity modifier.
    #[must_use]
    pub fn with_intensifier(mut self, word: impl Into<String>, multiplier: f32) -> Self {
        self.intensifiers.insert(word.into(), multiplier);
        self
    }
}

impl Default for Lexicon {
    /// The built-in table: casual/slang vocabulary plus a small set of
    /// everyday English sentiment words and emoji.
    fn default() -> Self {
        let mut lexicon = Self::empty();
        for (term, weight) in POSITIVE_TERMS.iter().chain(NEGATIVE_TERMS) {
            lexicon.terms.insert((*term).to_string(), *weight);
        }
        for (symbol, weight) in SYMBOLS {
            lexicon.symbols.insert((*symbol).to_string(), *weight);
        }
        lexicon.negations = NEGATIONS.iter().map(|w| (*w).to_string()).collect();
        for (word, multiplier) in INTENSIFIERS {
            lexicon.intensifiers.insert((*word).to_string(), *multiplier);
        }
        lexicon
    }
}

// ---------------------------------------------------------------------------
// Compiled form
// ---------------------------------------------------------------------------

/// A multi-word term, matched atomically against the token stream.
#[derive(Debug, Clone)]
pub(crate) struct Phrase {
    pub words: Vec<String>,
    pub placeholder: String,
}

/// Lexicon with keys normalized and phrases split out for token matching.
#[derive(Debug, Clone)]
pub(crate) struct CompiledLexicon {
    /// Single-token key → (display term, weight). Phrases appear under their
    /// placeholder token.
    pub terms: BTreeMap<String, (String, f32)>,
    /// Longest phrases first so "you ate that" wins over "ate".
    pub phrases: Vec<Phrase>,
    pub symbols: Vec<(String, f32)>,
    pub negations: BTreeSet<String>,
    pub intensifiers: BTreeMap<String, f32>,
}

impl CompiledLexicon {
    pub fn compile(lexicon: &Lexicon) -> Self {
        let mut terms = BTreeMap::new();
        let mut phrases = Vec::new();

        for (term, weight) in &lexicon.terms {
            let key = normalize(term);
            if key.is_empty() {
                continue;
            }
            if key.contains(' ') {
                let words: Vec<String> = key.split(' ').map(str::to_string).collect();
                let placeholder = words.join("_");
                terms.insert(placeholder.clone(), (term.clone(), *weight));
                phrases.push(Phrase { words, placeholder });
            } else {
                terms.insert(key, (term.clone(), *weight));
            }
        }
        phrases.sort_by(|a, b| b.words.len().cmp(&a.words.len()));

        Self {
            terms,
            phrases,
            symbols: lexicon
                .symbols
                .iter()
                .filter(|(s, _)| !s.is_empty())
                .map(|(s, w)| (s.clone(), *w))
                .collect(),
            negations: lexicon.negations.iter().map(|w| normalize(w)).collect(),
            intensifiers: lexicon
                .intensifiers
                .iter()
                .map(|(w, m)| (normalize(w), *m))
                .collect(),
        }
    }

    /// Replace every phrase occurrence in `tokens` with its placeholder.
    pub fn substitute_phrases(&self, tokens: &[&str]) -> Vec<String> {
        let mut out = Vec::with_capacity(tokens.len());
        let mut i = 0;
        'outer: while i < tokens.len() {
            for phrase in &self.phrases {
                let n = phrase.words.len();
                if i + n <= tokens.len()
                    && phrase.words.iter().zip(&tokens[i..i + n]).all(|(w, t)| w == t)
                {
                    out.push(phrase.placeholder.clone());
                    i += n;
                    continue 'outer;
                }
            }
            out.push(tokens[i].to_string());
            i += 1;
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Built-in tables
// ---------------------------------------------------------------------------

const POSITIVE_TERMS: &[(&str, f32)] = &[
    // Slang
    ("bet", 0.8),
    ("no cap", 0.9),
    ("slay", 0.95),
    ("slays", 0.95),
    ("rizz", 0.7),
    ("fire", 0.9),
    ("vibes", 0.6),
    ("periodt", 0.8),
    ("bestie", 0.7),
    ("iconic", 0.9),
    ("serving", 0.8),
    ("queen", 0.8),
    ("king", 0.8),
    ("facts", 0.7),
    ("based", 0.7),
    ("bussin", 0.8),
    ("slaps", 0.8),
    ("goated", 0.9),
    ("valid", 0.7),
    ("sends me", 0.8),
    ("understood the assignment", 0.9),
    ("ate", 0.9),
    ("main character", 0.8),
    ("you ate that", 0.9),
    ("real one", 0.8),
    ("hard launch", 0.7),
    ("it's giving", 0.7),
    ("extra af", 0.8),
    ("glow up", 0.8),
    ("thriving", 0.7),
    // Everyday
    ("good", 0.6),
    ("great", 0.8),
    ("awesome", 0.9),
    ("amazing", 0.9),
    ("love", 0.8),
    ("happy", 0.7),
    ("nice", 0.5),
    ("cool", 0.5),
    ("fun", 0.5),
    ("glad", 0.6),
    ("excited", 0.7),
    ("wonderful", 0.9),
    ("fantastic", 0.9),
    ("best", 0.8),
];

const NEGATIVE_TERMS: &[(&str, f32)] = &[
    // Slang
    ("cap", -0.6),
    ("sus", -0.7),
    ("mid", -0.8),
    ("cringe", -0.9),
    ("toxic", -0.9),
    ("salty", -0.6),
    ("ratio", -0.7),
    ("down bad", -0.7),
    ("cheugy", -0.6),
    ("pressed", -0.6),
    ("rent free", -0.5),
    ("yikes", -0.7),
    ("ick", -0.8),
    ("flop", -0.8),
    ("canceled", -0.9),
    ("dead", -0.8),
    ("npc", -0.7),
    ("not it", -0.7),
    ("dry af", -0.8),
    ("doing too much", -0.6),
    ("weird flex", -0.6),
    ("clown", -0.7),
    ("broke behavior", -0.8),
    // Everyday
    ("bad", -0.6),
    ("terrible", -0.9),
    ("awful", -0.9),
    ("hate", -0.8),
    ("sad", -0.7),
    ("angry", -0.7),
    ("boring", -0.5),
    ("annoying", -0.6),
    ("tired", -0.4),
    ("worst", -0.9),
    ("horrible", -0.9),
    ("upset", -0.6),
];

const SYMBOLS: &[(&str, f32)] = &[
    ("🔥", 0.3),
    ("✨", 0.3),
    ("💯", 0.3),
    ("😊", 0.3),
    ("👑", 0.3),
    ("🚀", 0.3),
    ("💪", 0.3),
    ("🎉", 0.3),
    ("😬", -0.3),
    ("👀", -0.3),
    ("☕", -0.3),
    ("🤔", -0.3),
    ("💔", -0.3),
    ("📉", -0.3),
    ("🚨", -0.3),
    ("😭", -0.3),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "dont", "doesnt", "didnt", "isnt", "wasnt", "arent", "aint", "cant",
    "wont", "hardly", "nothing", "neither", "nor",
];

const INTENSIFIERS: &[(&str, f32)] = &[
    ("very", 1.5),
    ("really", 1.4),
    ("so", 1.3),
    ("super", 1.5),
    ("extremely", 1.8),
    ("totally", 1.4),
    ("highkey", 1.3),
    ("lowkey", 0.8),
    ("kinda", 0.7),
    ("slightly", 0.6),
    ("somewhat", 0.7),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_splits_phrases_and_normalizes_keys() {
        let lexicon = Lexicon::empty()
            .with_term("No Cap", 0.9)
            .with_term("It's giving", 0.7)
            .with_term("cap", -0.6);
        let compiled = CompiledLexicon::compile(&lexicon);
        assert!(compiled.terms.contains_key("no_cap"));
        assert!(compiled.terms.contains_key("its_giving"));
        assert!(compiled.terms.contains_key("cap"));
        assert_eq!(compiled.phrases.len(), 2);
    }

    #[test]
    fn phrases_substitute_longest_first() {
        let lexicon = Lexicon::empty()
            .with_term("ate", 0.9)
            .with_term("you ate that", 0.9)
            .with_term("no cap", 0.9);
        let compiled = CompiledLexicon::compile(&lexicon);
        let out = compiled.substitute_phrases(&["wow", "you", "ate", "that", "no", "cap"]);
        assert_eq!(out, vec!["wow", "you_ate_that", "no_cap"]);
    }

    #[test]
    fn default_lexicon_is_populated() {
        let lexicon = Lexicon::default();
        assert!(lexicon.terms.len() > 50);
        assert!(lexicon.negations.contains("not"));
        assert!((lexicon.intensifiers["very"] - 1.5).abs() < f32::EPSILON);
        assert!(lexicon.symbols["🔥"] > 0.0);
    }
}
