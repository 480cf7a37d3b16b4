//! Sentiment Scorer: lexicon-driven polarity with negation and emphasis.
//!
//! Scoring a text:
//! 1. Every symbol in the lexicon adds its weight once per occurrence.
//! 2. The normalized text is tokenized and multi-word terms are replaced by
//!    single placeholder tokens.
//! 3. Each weighted token is flipped and dampened when one of the two
//!    preceding tokens is a negation, then scaled by an intensifier directly
//!    before it.
//!
//! The aggregate is classified with a symmetric margin; confidence grows
//! linearly with intensity and saturates at `1.0`.

pub mod lexicon;
pub mod phrases;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::SentimentConfig;
use crate::similarity::PreparedText;

pub use lexicon::Lexicon;
use lexicon::CompiledLexicon;

/// Overall polarity of a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    /// Aggregate above the positive margin.
    Positive,
    /// Aggregate below the negative margin.
    Negative,
    /// Anything in between.
    Neutral,
}

/// Coarse intensity bucket used to pick mood phrases.
///
/// Mood phrases are only appended above confidence `0.5` (intensity `1.0`)
/// by default, so the bounds sit above that floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntensityTier {
    /// `intensity < 1.4`
    Mild,
    /// `1.4 <= intensity < 2.0`
    Moderate,
    /// `intensity >= 2.0`
    Strong,
}

impl IntensityTier {
    /// Bucket an intensity value.
    #[must_use]
    pub fn from_intensity(intensity: f32) -> Self {
        if intensity >= 2.0 {
            Self::Strong
        } else if intensity >= 1.4 {
            Self::Moderate
        } else {
            Self::Mild
        }
    }
}

/// One lexicon term found in the text and what it contributed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermContribution {
    /// The lexicon term as written in the lexicon.
    pub term: String,
    /// Final signed contribution after negation and intensity.
    pub contribution: f32,
    /// Whether a negation word flipped it.
    pub was_negated: bool,
}

/// Result of scoring a text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Signed aggregate, typically within `[-3, 3]`.
    pub score: f32,
    /// Classified polarity.
    pub overall: Polarity,
    /// `|score|`.
    pub intensity: f32,
    /// `min(1, intensity / 2)`.
    pub confidence: f32,
    /// Word and phrase contributions in text order. Symbols are not listed.
    pub contributing_terms: Vec<TermContribution>,
}

impl SentimentResult {
    /// A result with nothing found.
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            score: 0.0,
            overall: Polarity::Neutral,
            intensity: 0.0,
            confidence: 0.0,
            contributing_terms: Vec::new(),
        }
    }

    /// The term with the largest absolute contribution. Earlier terms win ties.
    #[must_use]
    pub fn top_term(&self) -> Option<&TermContribution> {
        self.contributing_terms.iter().fold(None, |best, t| match best {
            Some(b) if b.contribution.abs() >= t.contribution.abs() => Some(b),
            _ => Some(t),
        })
    }

    /// Intensity bucket of this result.
    #[must_use]
    pub fn tier(&self) -> IntensityTier {
        IntensityTier::from_intensity(self.intensity)
    }
}

/// Whether sentiment should choose the base reply: only when no intent
/// matched, confidence is above `floor`, and at least one term was found.
#[must_use]
pub fn should_drive_reply(result: &SentimentResult, intent_matched: bool, floor: f32) -> bool {
    !intent_matched && result.confidence > floor && !result.contributing_terms.is_empty()
}

/// Scores text against an injected, read-only lexicon.
#[derive(Debug, Clone)]
pub struct SentimentScorer {
    lexicon: CompiledLexicon,
    config: SentimentConfig,
}

impl SentimentScorer {
    /// Compile `lexicon` for scoring with the given constants.
    #[must_use]
    pub fn new(lexicon: &Lexicon, config: SentimentConfig) -> Self {
        Self {
            lexicon: CompiledLexicon::compile(lexicon),
            config,
        }
    }

    /// Score `text`. Never fails; text without lexicon hits is neutral with
    /// zero confidence.
    #[must_use]
    pub fn score(&self, text: &str) -> SentimentResult {
        let symbol_score: f32 = self
            .lexicon
            .symbols
            .iter()
            .map(|(symbol, weight)| text.matches(symbol.as_str()).count() as f32 * weight)
            .sum();

        let prepared = PreparedText::new(text);
        let tokens = self.lexicon.substitute_phrases(&prepared.tokens());

        let mut contributing_terms = Vec::new();
        for (idx, token) in tokens.iter().enumerate() {
            let Some((term, base)) = self.lexicon.terms.get(token) else {
                continue;
            };
            if *base == 0.0 {
                continue;
            }

            let window = &tokens[idx.saturating_sub(self.config.negation_window)..idx];
            let was_negated = window.iter().any(|t| self.lexicon.negations.contains(t));
            let mut contribution = *base;
            if was_negated {
                contribution *= self.config.negation_factor;
            }
            if let Some(multiplier) = idx
                .checked_sub(1)
                .and_then(|prev| self.lexicon.intensifiers.get(&tokens[prev]))
            {
                contribution *= multiplier;
            }

            contributing_terms.push(TermContribution {
                term: term.clone(),
                contribution,
                was_negated,
            });
        }

        let score = symbol_score + contributing_terms.iter().map(|t| t.contribution).sum::<f32>();
        let overall = if score > self.config.polarity_margin {
            Polarity::Positive
        } else if score < -self.config.polarity_margin {
            Polarity::Negative
        } else {
            Polarity::Neutral
        };
        let intensity = score.abs();

        trace!(score, ?overall, terms = contributing_terms.len(), "Scored sentiment");

        SentimentResult {
            score,
            overall,
            intensity,
            confidence: (intensity / 2.0).min(1.0),
            contributing_terms,
        }
    }
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new(&Lexicon::default(), SentimentConfig::default())
    }
}
