//! Dialogue Context Manager: one input in, one reply out.
//!
//! A turn runs through these stages:
//!
//! 1. **Fact extraction**: lenient scan for names and preferences.
//! 2. **Introduction short-circuit**: a bare self-introduction is greeted
//!    directly and never ranked against the catalog.
//! 3. **Intent ranking**: every pattern of every intent competes for the
//!    single best score.
//! 4. **Base reply**: matched intent, else sentiment, else near-miss
//!    suggestions, else a generic fallback.
//! 5. **Context enrichment**: name questions, personalized greetings and
//!    recall of the previous utterance.
//! 6. **Mood modifier**: a short acknowledgement of strong sentiment.
//! 7. **Memory commit**: the turn and fact update go to the [`MemoryStore`].
//!
//! [`DialogueManager::respond`] never fails. Store errors are logged and
//! returned as [`TurnOutcome::warnings`] next to the reply.

pub mod cues;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::IntentCatalog;
use crate::choice::{Chooser, RandomChooser};
use crate::config::ParleyConfig;
use crate::error::{ParleyError, Result};
use crate::facts::{FactExtractor, UserFacts, NAME};
use crate::memory::MemoryStore;
use crate::sentiment::{phrases, should_drive_reply, Lexicon, SentimentResult, SentimentScorer};
use crate::similarity::{rank, PreparedText};
use crate::types::TurnRecord;

use cues::Cue;

/// Reply to empty or whitespace-only input.
pub const CLARIFICATION_PROMPT: &str = "I didn't catch that. Could you say something?";

/// Generic replies when nothing else applies.
pub const FALLBACK_REPLIES: &[&str] = &[
    "I'm sorry, I don't understand that.",
    "Could you rephrase that?",
    "That's interesting! Tell me more.",
    "I'm still learning. Can you try asking something else?",
];

/// Answer to a name question when no name is stored.
pub const UNKNOWN_NAME_REPLY: &str = "I don't know your name yet. What should I call you?";

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// Best catalog hit for an input. Produced fresh per turn.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchResult {
    /// Winning intent id.
    pub intent: Option<String>,
    /// The pattern that won.
    pub pattern: Option<String>,
    /// Its combined similarity, `0.0` without a match.
    pub score: f32,
}

impl MatchResult {
    /// Whether an intent was matched.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.intent.is_some()
    }
}

/// Where the base reply came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyKind {
    /// Empty input.
    Clarification,
    /// Bare self-introduction.
    Introduction,
    /// A catalog intent matched.
    Intent(String),
    /// Sentiment drove the reply.
    Sentiment,
    /// Near-miss patterns offered as a question.
    Suggestion,
    /// Nothing applied.
    Fallback,
}

/// How context changed the base reply, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enrichment {
    /// Answered a name question from stored facts.
    NameAnswer,
    /// Answered a name question without a stored name.
    NameUnknown,
    /// Prefixed a personalized greeting.
    Greeting,
    /// Prefixed a personalized "how are you" answer.
    HowAreYou,
    /// Quoted the previous user utterance.
    Recall,
}

/// Everything produced by one call to [`DialogueManager::respond`].
#[derive(Debug)]
pub struct TurnOutcome {
    /// Final reply text.
    pub reply: String,
    /// Source of the base reply.
    pub kind: ReplyKind,
    /// Context enrichment applied on top of the base reply.
    pub enrichment: Option<Enrichment>,
    /// Best catalog match.
    pub matched: MatchResult,
    /// Sentiment of the input.
    pub sentiment: SentimentResult,
    /// Facts extracted from this input, `None` when nothing was found.
    pub fact_update: Option<UserFacts>,
    /// Recoverable memory-store failures. The reply is valid regardless.
    pub warnings: Vec<ParleyError>,
}

impl TurnOutcome {
    fn clarification() -> Self {
        Self {
            reply: CLARIFICATION_PROMPT.to_string(),
            kind: ReplyKind::Clarification,
            enrichment: None,
            matched: MatchResult::default(),
            sentiment: SentimentResult::neutral(),
            fact_update: None,
            warnings: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// DialogueManager
// ---------------------------------------------------------------------------

/// Combines matching, sentiment and memory into replies for one conversation.
///
/// Owns its memory store. The catalog is shared behind an [`Arc`] so several
/// conversations can use the same table.
pub struct DialogueManager<S, C = RandomChooser> {
    catalog: Arc<IntentCatalog>,
    scorer: SentimentScorer,
    extractor: FactExtractor,
    config: ParleyConfig,
    store: S,
    chooser: C,
}

impl<S: std::fmt::Debug, C> std::fmt::Debug for DialogueManager<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogueManager")
            .field("intents", &self.catalog.len())
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl<S: MemoryStore> DialogueManager<S> {
    /// Built-in catalog and lexicon, default configuration, random replies.
    ///
    /// # Errors
    /// Returns [`ParleyError::Pattern`] if the fact patterns fail to compile.
    pub fn with_defaults(store: S) -> Result<Self> {
        Self::new(
            Arc::new(IntentCatalog::builtin()),
            &Lexicon::default(),
            ParleyConfig::default(),
            store,
            RandomChooser::default(),
        )
    }
}

impl<S: MemoryStore, C: Chooser> DialogueManager<S, C> {
    /// Assemble a manager from its collaborators.
    ///
    /// # Errors
    /// Returns [`ParleyError::Pattern`] if the fact patterns fail to compile.
    pub fn new(
        catalog: Arc<IntentCatalog>,
        lexicon: &Lexicon,
        config: ParleyConfig,
        store: S,
        chooser: C,
    ) -> Result<Self> {
        Ok(Self {
            catalog,
            scorer: SentimentScorer::new(lexicon, config.sentiment.clone()),
            extractor: FactExtractor::new(lexicon)?,
            config,
            store,
            chooser,
        })
    }

    /// The memory store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the memory store (sessions, reset).
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// The intent catalog.
    #[must_use]
    pub fn catalog(&self) -> &IntentCatalog {
        &self.catalog
    }

    /// Edit the catalog. Clones it first if another manager shares it.
    pub fn catalog_mut(&mut self) -> &mut IntentCatalog {
        Arc::make_mut(&mut self.catalog)
    }

    /// Produce a reply for `text` and commit the turn to memory.
    pub fn respond(&mut self, text: &str) -> TurnOutcome {
        if text.trim().is_empty() {
            debug!("Empty input, asking for clarification");
            return TurnOutcome::clarification();
        }

        let extracted = self.extractor.extract(text);
        let sentiment = self.scorer.score(text);
        let mut warnings = Vec::new();

        if let Some(name) = self.extractor.introduction(text) {
            let mut update = extracted;
            update.set_text(NAME, name.clone());
            let reply = format!("Nice to meet you, {name}! I'll remember that.");
            debug!(%name, "Direct self-introduction");
            self.commit(text, &reply, Some(&update), &mut warnings);
            return TurnOutcome {
                reply,
                kind: ReplyKind::Introduction,
                enrichment: None,
                matched: MatchResult::default(),
                sentiment,
                fact_update: Some(update),
                warnings,
            };
        }

        let input = PreparedText::new(text);
        let matched = self.best_intent(text);
        let (base, kind) = self.base_reply(text, &matched, &sentiment);

        let fact_update = (!extracted.is_empty()).then_some(extracted);
        let (mut reply, enrichment) =
            self.enrich(&input, base, fact_update.as_ref(), &mut warnings);

        if sentiment.confidence > self.config.sentiment.modifier_confidence_floor {
            let pool = phrases::mood_phrases(sentiment.overall, sentiment.tier());
            if let Some(mood) = self.chooser.choose(pool) {
                reply.push(' ');
                reply.push_str(mood);
            }
        }

        debug!(
            kind = ?kind,
            enrichment = ?enrichment,
            score = matched.score,
            sentiment = sentiment.score,
            "Selected reply"
        );

        self.commit(text, &reply, fact_update.as_ref(), &mut warnings);
        TurnOutcome {
            reply,
            kind,
            enrichment,
            matched,
            sentiment,
            fact_update,
            warnings,
        }
    }

    // ------------------------------------------------------------------
    // Stages
    // ------------------------------------------------------------------

    fn best_intent(&self, text: &str) -> MatchResult {
        let threshold = self.config.matching.threshold;
        rank(text, self.catalog.patterns(), threshold, 1)
            .into_iter()
            .next()
            .map_or_else(MatchResult::default, |hit| MatchResult {
                intent: Some(hit.item.intent.to_string()),
                pattern: Some(hit.item.pattern.to_string()),
                score: hit.score,
            })
    }

    fn base_reply(
        &mut self,
        text: &str,
        matched: &MatchResult,
        sentiment: &SentimentResult,
    ) -> (String, ReplyKind) {
        if let Some(intent) = &matched.intent {
            let response = self
                .catalog
                .get(intent)
                .and_then(|entry| self.chooser.choose(entry.responses()));
            if let Some(response) = response {
                return (response.clone(), ReplyKind::Intent(intent.clone()));
            }
        }

        let floor = self.config.sentiment.reply_confidence_floor;
        if should_drive_reply(sentiment, matched.is_match(), floor) {
            if let (Some(term), Some(template)) = (
                sentiment.top_term(),
                self.chooser.choose(phrases::reply_templates(sentiment.overall)),
            ) {
                return (phrases::fill(template, &term.term), ReplyKind::Sentiment);
            }
        }

        let matching = &self.config.matching;
        let suggestions = rank(
            text,
            self.catalog.patterns(),
            matching.suggestion_threshold,
            matching.suggestion_count,
        );
        if !suggestions.is_empty() {
            let quoted: Vec<String> = suggestions
                .iter()
                .map(|s| format!("\"{}\"", s.item.pattern))
                .collect();
            return (format!("Did you mean {}?", quoted.join(" or ")), ReplyKind::Suggestion);
        }

        let fallback = self
            .chooser
            .choose(FALLBACK_REPLIES)
            .copied()
            .unwrap_or(FALLBACK_REPLIES[0]);
        (fallback.to_string(), ReplyKind::Fallback)
    }

    fn enrich(
        &self,
        input: &PreparedText,
        base: String,
        fact_update: Option<&UserFacts>,
        warnings: &mut Vec<ParleyError>,
    ) -> (String, Option<Enrichment>) {
        let mut facts = self.store.facts().unwrap_or_else(|e| {
            warn!(error = %e, "Could not read stored facts");
            warnings.push(e);
            UserFacts::new()
        });
        if let Some(update) = fact_update {
            facts.merge(update);
        }

        if Cue::NameQuestion.present_in(input) {
            return match facts.name() {
                Some(name) => (
                    format!("You told me your name is {name}!"),
                    Some(Enrichment::NameAnswer),
                ),
                None => (UNKNOWN_NAME_REPLY.to_string(), Some(Enrichment::NameUnknown)),
            };
        }

        if let Some(name) = facts.name() {
            if Cue::Greeting.present_in(input) {
                return (format!("Hey {name}! {base}"), Some(Enrichment::Greeting));
            }
            if Cue::HowAreYou.present_in(input) {
                return (
                    format!("I'm doing great, {name}! {base}"),
                    Some(Enrichment::HowAreYou),
                );
            }
        }

        if Cue::Recall.present_in(input) {
            let recent = self
                .store
                .recent_turns(self.config.context.lookback_turns)
                .unwrap_or_else(|e| {
                    warn!(error = %e, "Could not read recent turns");
                    warnings.push(e);
                    Vec::new()
                });
            if let Some(TurnRecord { user_text, .. }) = recent.last() {
                return (
                    format!("You were saying: '{user_text}'"),
                    Some(Enrichment::Recall),
                );
            }
        }

        (base, None)
    }

    fn commit(
        &mut self,
        text: &str,
        reply: &str,
        fact_update: Option<&UserFacts>,
        warnings: &mut Vec<ParleyError>,
    ) {
        if let Err(e) = self.store.record_turn(text, reply, fact_update) {
            warn!(error = %e, "Turn was not recorded");
            warnings.push(e);
        }
    }
}
