//! Property-Based Tests for Parley Core
//!
//! Uses `proptest` to check the similarity and sentiment invariants over
//! random text, including empty and punctuation-only strings.

use proptest::prelude::*;

use parley_core::similarity::metrics::{jaccard, sequence_similarity};
use parley_core::similarity::{best_match, normalize, rank, similarity, PreparedText};
use parley_core::sentiment::{Lexicon, Polarity, SentimentScorer};
use parley_core::config::SentimentConfig;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Short phrases of lowercase words with occasional punctuation.
fn arb_phrase() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,8}[!?,.]?", 0..6).prop_map(|words| words.join(" "))
}

/// Non-empty phrases that survive normalization.
fn arb_word_phrase() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,8}", 1..6).prop_map(|words| words.join(" "))
}

fn arb_catalog() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_phrase(), 0..20)
}

// ---------------------------------------------------------------------------
// Similarity
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn combined_similarity_is_bounded(a in ".{0,30}", b in ".{0,30}") {
        let s = similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&s), "similarity {s} out of range");
    }

    #[test]
    fn similarity_is_reflexive(a in arb_word_phrase()) {
        prop_assert!((similarity(&a, &a) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn sequence_and_jaccard_are_symmetric(a in arb_phrase(), b in arb_phrase()) {
        let (na, nb) = (normalize(&a), normalize(&b));
        prop_assert!((sequence_similarity(&na, &nb) - sequence_similarity(&nb, &na)).abs() < 1e-6);

        let (pa, pb) = (PreparedText::new(&a), PreparedText::new(&b));
        prop_assert!((jaccard(&pa.stems(), &pb.stems()) - jaccard(&pb.stems(), &pa.stems())).abs() < 1e-6);
    }

    #[test]
    fn ranking_respects_cap_threshold_and_order(
        input in arb_phrase(),
        candidates in arb_catalog(),
        threshold in 0.0f32..1.0,
        top_n in 0usize..5,
    ) {
        let ranked = rank(&input, candidates.iter(), threshold, top_n);
        prop_assert!(ranked.len() <= top_n);
        for r in &ranked {
            prop_assert!(r.score >= threshold);
        }
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn best_match_is_top_of_ranking(input in arb_word_phrase(), candidates in arb_catalog()) {
        let best = best_match(&input, candidates.iter(), 0.3);
        let ranked = rank(&input, candidates.iter(), 0.0, 1);
        match best.phrase {
            Some(phrase) => {
                prop_assert!(best.score > 0.3);
                prop_assert_eq!(ranked.first().map(|r| r.item.as_str()), Some(phrase.as_str()));
            }
            None => prop_assert!(best.score.abs() < f32::EPSILON),
        }
    }
}

// ---------------------------------------------------------------------------
// Sentiment
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn text_without_lexicon_terms_is_neutral(text in "[0-9 ]{0,40}") {
        let scorer = SentimentScorer::default();
        let result = scorer.score(&text);
        prop_assert!(result.score.abs() < f32::EPSILON);
        prop_assert_eq!(result.overall, Polarity::Neutral);
        prop_assert!(result.confidence.abs() < f32::EPSILON);
        prop_assert!(result.contributing_terms.is_empty());
    }

    #[test]
    fn confidence_stays_in_unit_range(text in ".{0,60}") {
        let result = SentimentScorer::default().score(&text);
        prop_assert!((0.0..=1.0).contains(&result.confidence));
        prop_assert!((result.intensity - result.score.abs()).abs() < f32::EPSILON);
    }

    #[test]
    fn negation_flips_and_dampens(weight in 0.1f32..1.0) {
        let lexicon = Lexicon::empty()
            .with_term("good", weight)
            .with_negation("not")
            .with_intensifier("very", 1.5);
        let scorer = SentimentScorer::new(&lexicon, SentimentConfig::default());

        let plain = scorer.score("good").score;
        let negated = scorer.score("not good").score;
        let intensified = scorer.score("very good").score;

        prop_assert!(negated < 0.0);
        prop_assert!(plain > 0.0);
        prop_assert!(negated.abs() < intensified.abs());
    }
}
