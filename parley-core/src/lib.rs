//! # Parley Core Library
//!
//! A rule-based conversational responder. Given free text, it picks a reply
//! by matching the input against a catalog of known phrasings, shades the
//! reply with a lexicon-based sentiment signal, and personalizes it with
//! short-term conversational memory.
//!
//! - **Similarity**: normalization, stemming, edit distance, Jaccard and
//!   token best-match, combined by taking the maximum
//! - **Sentiment**: lexicon scorer with negation, intensifiers and a
//!   symbol channel
//! - **Dialogue**: [`DialogueManager`] turns one input into one reply and
//!   commits the turn to a [`MemoryStore`]
//!
//! ## Performance Contract
//!
//! Every turn is synchronous, bounded and CPU-only over short strings. The
//! only I/O is the memory store, read during enrichment and written once
//! at the end of the turn.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod choice;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod facts;
pub mod memory;
pub mod sentiment;
pub mod similarity;
pub mod types;

pub use catalog::{IntentCatalog, IntentEntry};
pub use config::ParleyConfig;
pub use dialogue::{DialogueManager, ReplyKind, TurnOutcome};
pub use error::ParleyError;
pub use memory::sqlite::SqliteStore;
pub use memory::{InMemoryStore, MemoryStats, MemoryStore};
pub use types::*;
