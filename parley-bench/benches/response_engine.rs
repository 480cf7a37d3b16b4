//! Parley Benchmark Suite
//!
//! Hot paths of a single turn:
//!   similarity_pair ................. one combined similarity
//!   rank_builtin_catalog ............ global ranking over every pattern
//!   sentiment_score ................. lexicon scoring with negation
//!   respond_in_memory ............... a full turn against `InMemoryStore`

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use parley_core::choice::FixedChooser;
use parley_core::sentiment::{Lexicon, SentimentScorer};
use parley_core::similarity::{rank, similarity};
use parley_core::{DialogueManager, InMemoryStore, IntentCatalog, ParleyConfig};

/// Benchmark: combined similarity of two short phrases.
fn bench_similarity(c: &mut Criterion) {
    c.bench_function("similarity_pair", |b| {
        b.iter(|| similarity(black_box("how's it going today"), black_box("how is it going")));
    });
}

/// Benchmark: top-1 ranking over the built-in catalog.
fn bench_rank(c: &mut Criterion) {
    let catalog = IntentCatalog::builtin();
    c.bench_function("rank_builtin_catalog", |b| {
        b.iter(|| rank(black_box("what's your name bestie"), catalog.patterns(), 0.3, 1));
    });
}

/// Benchmark: scoring a sentence with phrases, negation and emoji.
fn bench_sentiment(c: &mut Criterion) {
    let scorer = SentimentScorer::default();
    c.bench_function("sentiment_score", |b| {
        b.iter(|| scorer.score(black_box("not gonna lie this is not bad, no cap it slaps 🔥🔥")));
    });
}

/// Benchmark: a whole turn, including the memory commit.
fn bench_respond(c: &mut Criterion) {
    let mut bot = DialogueManager::new(
        Arc::new(IntentCatalog::builtin()),
        &Lexicon::default(),
        ParleyConfig::default(),
        InMemoryStore::default(),
        FixedChooser(0),
    )
    .expect("manager");
    bot.respond("my name is Alex");

    c.bench_function("respond_in_memory", |b| {
        b.iter(|| black_box(bot.respond(black_box("hey, how are you doing today?"))));
    });
}

criterion_group!(
    benches,
    bench_similarity,
    bench_rank,
    bench_sentiment,
    bench_respond,
);
criterion_main!(benches);
