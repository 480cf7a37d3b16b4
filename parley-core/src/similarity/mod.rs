//! Similarity Engine: fuzzy phrase matching for the intent catalog.
//!
//! Three scores are computed for a pair of strings and the **maximum** wins:
//!
//! - **Jaccard** over stemmed token sets (word order, plurals)
//! - **Sequence** similarity from edit distance (typos)
//! - **Token best-match** averaged per input token (partial phrase overlap)
//!
//! Every score is an `f32` in `[0, 1]`.

pub mod metrics;
pub mod text;

use std::cmp::Reverse;

use ordered_float::OrderedFloat;

pub use text::{PreparedText, normalize, stem};

/// Per-component breakdown of a combined similarity score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimilarityBreakdown {
    /// Jaccard index of stemmed token sets.
    pub jaccard: f32,
    /// Edit-distance similarity of the full normalized strings.
    pub sequence: f32,
    /// Averaged best per-token edit similarity.
    pub token: f32,
}

impl SimilarityBreakdown {
    /// Compare two prepared texts.
    #[must_use]
    pub fn between(a: &PreparedText, b: &PreparedText) -> Self {
        Self {
            jaccard: metrics::jaccard(&a.stems(), &b.stems()),
            sequence: metrics::sequence_similarity(a.normalized(), b.normalized()),
            token: metrics::token_best_match(&a.tokens(), &b.tokens()),
        }
    }

    /// The combined score: the best of the three components.
    #[must_use]
    pub fn combined(&self) -> f32 {
        self.jaccard.max(self.sequence).max(self.token)
    }
}

/// Combined similarity of two raw strings, in `[0, 1]`.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f32 {
    SimilarityBreakdown::between(&PreparedText::new(a), &PreparedText::new(b)).combined()
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// A candidate paired with its similarity to the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<T> {
    /// The candidate as supplied by the caller.
    pub item: T,
    /// Combined similarity to the input.
    pub score: f32,
}

/// Rank `candidates` against `input`.
///
/// Returns at most `top_n` candidates scoring `>= threshold`, best first.
/// Equal scores keep their input order.
#[must_use]
pub fn rank<T, I>(input: &str, candidates: I, threshold: f32, top_n: usize) -> Vec<Ranked<T>>
where
    T: AsRef<str>,
    I: IntoIterator<Item = T>,
{
    if top_n == 0 {
        return Vec::new();
    }
    let prepared = PreparedText::new(input);
    let mut ranked: Vec<Ranked<T>> = candidates
        .into_iter()
        .filter_map(|item| {
            let score =
                SimilarityBreakdown::between(&prepared, &PreparedText::new(item.as_ref()))
                    .combined();
            (score >= threshold).then_some(Ranked { item, score })
        })
        .collect();

    // sort_by_key is stable, which preserves catalog order on ties.
    ranked.sort_by_key(|r| Reverse(OrderedFloat(r.score)));
    ranked.truncate(top_n);
    ranked
}

// ---------------------------------------------------------------------------
// Single best match
// ---------------------------------------------------------------------------

/// Outcome of [`best_match`].
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    /// The winning phrase, if any cleared the threshold.
    pub phrase: Option<String>,
    /// Its score, `0.0` when there is no match.
    pub score: f32,
}

impl FuzzyMatch {
    /// The "no match" sentinel.
    pub const NONE: Self = Self {
        phrase: None,
        score: 0.0,
    };

    /// Whether a phrase was found.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.phrase.is_some()
    }
}

/// The single highest-scoring target, if its score strictly exceeds
/// `threshold`. Earlier targets win ties.
#[must_use]
pub fn best_match<T, I>(input: &str, targets: I, threshold: f32) -> FuzzyMatch
where
    T: AsRef<str>,
    I: IntoIterator<Item = T>,
{
    let prepared = PreparedText::new(input);
    let mut best: Option<(T, f32)> = None;
    for target in targets {
        let score =
            SimilarityBreakdown::between(&prepared, &PreparedText::new(target.as_ref())).combined();
        if best.as_ref().is_none_or(|(_, s)| score > *s) {
            best = Some((target, score));
        }
    }

    match best {
        Some((target, score)) if score > threshold => FuzzyMatch {
            phrase: Some(target.as_ref().to_string()),
            score,
        },
        _ => FuzzyMatch::NONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_one() {
        assert!((similarity("Hello there", "hello there!") - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn typo_is_caught_by_edit_distance() {
        let b = SimilarityBreakdown::between(
            &PreparedText::new("helo"),
            &PreparedText::new("hello"),
        );
        assert!(b.jaccard.abs() < f32::EPSILON);
        assert!((b.sequence - 0.8).abs() < 1e-6);
        assert!((b.combined() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn reordering_is_caught_by_jaccard() {
        let b = SimilarityBreakdown::between(
            &PreparedText::new("thanks you"),
            &PreparedText::new("you thank"),
        );
        assert!((b.jaccard - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn unrelated_strings_score_low() {
        assert!(similarity("xyzzy", "goodbye") < 0.3);
    }

    #[test]
    fn empty_inputs_are_bounded() {
        assert!((similarity("", "") - 1.0).abs() < f32::EPSILON);
        let s = similarity("", "hello");
        assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn rank_filters_sorts_and_caps() {
        let candidates = ["goodbye", "hello", "hell", "help me", "hello there"];
        let ranked = rank("hello", candidates, 0.5, 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].item, "hello");
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(ranked.iter().all(|r| r.score >= 0.5));
    }

    #[test]
    fn rank_keeps_input_order_on_ties() {
        let ranked = rank("hi", ["hi", "HI!", "hi."], 0.0, 10);
        let items: Vec<_> = ranked.iter().map(|r| r.item).collect();
        assert_eq!(items, vec!["hi", "HI!", "hi."]);
    }

    #[test]
    fn rank_with_zero_cap_is_empty() {
        assert!(rank("hi", ["hi"], 0.0, 0).is_empty());
    }

    #[test]
    fn best_match_requires_exceeding_threshold() {
        let m = best_match("goodbye", ["bye", "goodbye", "good bye"], 0.5);
        assert_eq!(m.phrase.as_deref(), Some("goodbye"));
        assert!((m.score - 1.0).abs() < f32::EPSILON);

        // A perfect score does not exceed a threshold of 1.0.
        assert_eq!(best_match("goodbye", ["goodbye"], 1.0), FuzzyMatch::NONE);
        assert!(!best_match("x", Vec::<String>::new(), 0.0).is_match());
    }
}
