//! # Parley Chat
//!
//! Interactive front end for [`parley_core`]. Reads one line at a time,
//! handles the `exit`, `memory stats`, `clear memory` and `add intent`
//! commands, and hands everything else to the responder.
//!
//! Replies go to stdout. Logs and store warnings go to stderr.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod repl;
pub mod setup;

pub use repl::{Command, Repl};
