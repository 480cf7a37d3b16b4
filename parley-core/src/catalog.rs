//! Intent catalog: named buckets of example phrasings and replies.
//!
//! On disk the catalog is a JSON object keyed by intent id:
//!
//! ```json
//! { "greetings": { "patterns": ["hello", "hi"], "responses": ["Hi there!"] } }
//! ```
//!
//! Every entry must carry at least one response, and every pattern must keep
//! some text after normalization. An entry without patterns is legal but can
//! never be matched.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ParleyError, Result};
use crate::similarity::normalize;

/// One intent: its id, example phrasings and candidate replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentEntry {
    name: String,
    patterns: Vec<String>,
    responses: Vec<String>,
}

impl IntentEntry {
    /// Create a validated entry.
    ///
    /// # Errors
    /// Returns [`ParleyError::Catalog`] if the name is blank, a pattern is
    /// blank or punctuation-only, or there are no responses.
    pub fn new<P, R>(name: impl Into<String>, patterns: P, responses: R) -> Result<Self>
    where
        P: IntoIterator,
        P::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        let name = name.into();
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let responses: Vec<String> = responses.into_iter().map(Into::into).collect();

        if name.trim().is_empty() {
            return Err(ParleyError::Catalog {
                intent: name,
                reason: "intent id is empty".to_string(),
            });
        }
        if let Some(pattern) = patterns.iter().find(|p| normalize(p).is_empty()) {
            return Err(ParleyError::Catalog {
                intent: name,
                reason: format!("pattern {pattern:?} has no matchable text"),
            });
        }
        if responses.is_empty() {
            return Err(ParleyError::Catalog {
                intent: name,
                reason: "an intent needs at least one response".to_string(),
            });
        }

        Ok(Self {
            name,
            patterns,
            responses,
        })
    }

    /// Intent id.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Example phrasings, in order.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Reply templates, never empty.
    #[must_use]
    pub fn responses(&self) -> &[String] {
        &self.responses
    }
}

/// A pattern together with the intent it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogPattern<'a> {
    /// Owning intent id.
    pub intent: &'a str,
    /// The phrasing.
    pub pattern: &'a str,
}

impl AsRef<str> for CatalogPattern<'_> {
    fn as_ref(&self) -> &str {
        self.pattern
    }
}

#[derive(Serialize, Deserialize)]
struct EntryBody {
    #[serde(default)]
    patterns: Vec<String>,
    #[serde(default)]
    responses: Vec<String>,
}

/// Ordered, read-only (outside of [`IntentCatalog::upsert`]) set of intents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntentCatalog {
    entries: Vec<IntentEntry>,
}

impl IntentCatalog {
    /// An empty catalog. Legal; the responder then only uses fallbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON mapping format. Entries come out ordered by id.
    ///
    /// # Errors
    /// Returns [`ParleyError::Serialization`] on malformed JSON and
    /// [`ParleyError::Catalog`] if any entry is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, EntryBody> = serde_json::from_str(json)?;
        let entries = raw
            .into_iter()
            .map(|(name, body)| IntentEntry::new(name, body.patterns, body.responses))
            .collect::<Result<Vec<_>>>()?;
        debug!(intents = entries.len(), "Parsed intent catalog");
        Ok(Self { entries })
    }

    /// Load a JSON catalog file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        info!(path = %path.display(), intents = catalog.len(), "Loaded intent catalog");
        Ok(catalog)
    }

    /// Serialize to the pretty-printed JSON mapping format.
    ///
    /// # Errors
    /// Returns [`ParleyError::Serialization`] if encoding fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        let map: BTreeMap<&str, EntryBody> = self
            .entries
            .iter()
            .map(|e| {
                (
                    e.name.as_str(),
                    EntryBody {
                        patterns: e.patterns.clone(),
                        responses: e.responses.clone(),
                    },
                )
            })
            .collect();
        Ok(serde_json::to_string_pretty(&map)?)
    }

    /// Write the catalog to `path` as JSON.
    ///
    /// # Errors
    /// Returns an error if encoding or writing fails.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        info!(path = %path.display(), intents = self.len(), "Saved intent catalog");
        Ok(())
    }

    /// Add an intent, or replace the one with the same id in place.
    /// Returns the replaced entry.
    pub fn upsert(&mut self, entry: IntentEntry) -> Option<IntentEntry> {
        if let Some(slot) = self.entries.iter_mut().find(|e| e.name == entry.name) {
            return Some(std::mem::replace(slot, entry));
        }
        self.entries.push(entry);
        None
    }

    /// Look up an intent by id.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&IntentEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// All intents in catalog order.
    #[must_use]
    pub fn entries(&self) -> &[IntentEntry] {
        &self.entries
    }

    /// Every pattern of every intent, in catalog order.
    pub fn patterns(&self) -> impl Iterator<Item = CatalogPattern<'_>> {
        self.entries.iter().flat_map(|e| {
            e.patterns.iter().map(move |p| CatalogPattern {
                intent: &e.name,
                pattern: p,
            })
        })
    }

    /// Number of intents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no intents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The catalog shipped with parley.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(name, patterns, responses)| IntentEntry {
                name: (*name).to_string(),
                patterns: patterns.iter().map(|p| (*p).to_string()).collect(),
                responses: responses.iter().map(|r| (*r).to_string()).collect(),
            })
            .collect();
        Self { entries }
    }
}

type BuiltinIntent = (&'static str, &'static [&'static str], &'static [&'static str]);

const BUILTIN: &[BuiltinIntent] = &[
    (
        "greetings",
        &[
            "hello", "hi", "hey", "yow", "howdy", "hola", "good morning", "good afternoon",
            "good evening", "sup",
        ],
        &[
            "Hello!",
            "Hi there!",
            "Hey!",
            "What's good?",
            "Greetings!",
            "Nice to meet you!",
            "How can I help you today?",
            "Sup?",
        ],
    ),
    (
        "goodbye",
        &["bye", "goodbye", "see you", "farewell", "take care", "catch you later"],
        &["Goodbye!", "See you later!", "Take care!", "Bye!", "Have a great day!"],
    ),
    (
        "how_are_you",
        &["how are you", "how do you do", "how's it going", "what's up", "how are things"],
        &[
            "I'm doing well, thank you!",
            "I'm great! How about you?",
            "All good here!",
            "I'm fine, thanks for asking!",
        ],
    ),
    (
        "name",
        &["what is your name", "who are you", "what should I call you", "your name"],
        &[
            "I'm Parley!",
            "You can call me Parley!",
            "I'm your friendly assistant, Parley!",
        ],
    ),
    (
        "help",
        &["help", "what can you do", "commands", "options"],
        &[
            "I can chat with you! Try saying hello, asking how I am, or just have a conversation!",
            "I'm here to chat! Ask me anything!",
            "I can respond to greetings, questions about myself, and general conversation!",
        ],
    ),
    (
        "thanks",
        &["thank you", "thanks", "appreciate it", "thx"],
        &["You're welcome!", "Happy to help!", "No problem!", "Anytime!", "Glad I could help!"],
    ),
    (
        "slang",
        &[
            "bet", "no cap", "slay", "slays", "rizz", "big rizz", "no rizz", "lowkey fire",
        ],
        &[
            "Bet! I'm picking up what you're putting down! 💯",
            "No cap, that's pretty cool! 🔥",
            "Slay bestie! You're absolutely serving! ✨",
            "Your energy is giving main character vibes! 💅",
            "That's lowkey fire, not gonna lie! 🔥",
            "Periodt! You understood the assignment! 💯",
        ],
    ),
    (
        "sus",
        &["that's sus", "kinda sus", "sus behavior", "acting sus", "seems sus", "sus af"],
        &[
            "Sus indeed! 👀 What's the tea?",
            "I'm getting sus vibes too... spill! ☕",
            "That's giving major sus energy ngl 🤔",
            "Sus alert! 🚨 We need answers!",
        ],
    ),
    (
        "mid",
        &["that's mid", "pretty mid", "kinda mid", "so mid", "mid energy", "absolutely mid"],
        &[
            "Oof, mid? That's rough buddy 😬",
            "Mid is not the vibe we're going for! 📉",
            "Mid hits different when you were expecting fire 💔",
            "We don't settle for mid energy here! ✋",
        ],
    ),
    (
        "cap",
        &["that's cap", "you're capping", "stop capping", "cap fr", "big cap"],
        &[
            "Cap? Me? Never! I only speak facts! 🧢",
            "No cap detected here, bestie! 💯",
            "Zero cap in this household! Only truth! ✨",
        ],
    ),
];
