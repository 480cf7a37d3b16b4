//! The read-respond-print loop and its commands.
//!
//! Generic over the input and output streams so whole sessions can be
//! scripted in tests.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use parley_core::catalog::IntentEntry;
use parley_core::choice::Chooser;
use parley_core::facts::FactValue;
use parley_core::{DialogueManager, MemoryStore};
use tracing::{info, warn};

/// Printed when the loop ends.
pub const FAREWELL: &str = "Goodbye! I'll remember our chat!";

/// One line of user input, classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// `exit`, `quit` or `bye`.
    Exit,
    /// `memory stats`.
    Stats,
    /// `clear memory`.
    Clear,
    /// `add intent`.
    AddIntent,
    /// Blank line.
    Skip,
    /// Anything else goes to the responder.
    Say(&'a str),
}

impl<'a> Command<'a> {
    /// Classify a raw input line.
    #[must_use]
    pub fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        match trimmed.to_lowercase().as_str() {
            "exit" | "quit" | "bye" => Self::Exit,
            "memory stats" => Self::Stats,
            "clear memory" => Self::Clear,
            "add intent" => Self::AddIntent,
            "" => Self::Skip,
            _ => Self::Say(trimmed),
        }
    }
}

/// A chat session bound to one [`DialogueManager`].
pub struct Repl<S, C> {
    bot: DialogueManager<S, C>,
    catalog_path: Option<PathBuf>,
}

impl<S: MemoryStore, C: Chooser> Repl<S, C> {
    /// Wrap `bot`. New intents are written to `catalog_path` when set.
    #[must_use]
    pub fn new(bot: DialogueManager<S, C>, catalog_path: Option<PathBuf>) -> Self {
        Self { bot, catalog_path }
    }

    /// The wrapped responder.
    #[must_use]
    pub fn bot(&self) -> &DialogueManager<S, C> {
        &self.bot
    }

    /// Run until `exit` or end of input.
    ///
    /// # Errors
    /// Returns an error only if reading input or writing output fails.
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> anyhow::Result<()> {
        writeln!(out, "Parley: Hello! Type 'exit' to end.")?;
        writeln!(out, "Parley: Commands: 'add intent' | 'memory stats' | 'clear memory'")?;

        loop {
            let Some(line) = prompt(input, out, "You: ")? else {
                break;
            };
            match Command::parse(&line) {
                Command::Exit => break,
                Command::Skip => {}
                Command::Stats => self.print_stats(out)?,
                Command::Clear => match self.bot.store_mut().reset() {
                    Ok(()) => writeln!(out, "Parley: Memory cleared! Starting fresh.")?,
                    Err(e) => writeln!(out, "Parley: Sorry, I couldn't clear my memory: {e}")?,
                },
                Command::AddIntent => self.add_intent(input, out)?,
                Command::Say(text) => {
                    let outcome = self.bot.respond(text);
                    writeln!(out, "Parley: {}", outcome.reply)?;
                    for warning in &outcome.warnings {
                        eprintln!("warning: {warning}");
                    }
                }
            }
        }

        writeln!(out, "Parley: {FAREWELL}")?;
        Ok(())
    }

    fn print_stats<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        let stats = match self.bot.store().stats() {
            Ok(stats) => stats,
            Err(e) => {
                writeln!(out, "Parley: Sorry, I couldn't read my memory: {e}")?;
                return Ok(());
            }
        };

        writeln!(out, "Memory Stats:")?;
        writeln!(out, "   Total conversations: {}", stats.turns)?;
        writeln!(out, "   Current session: {}", stats.session)?;
        if stats.facts.is_empty() {
            writeln!(out, "   I don't know much about you yet!")?;
        } else {
            writeln!(out, "   What I know about you:")?;
            for (key, value) in stats.facts.iter() {
                match value {
                    FactValue::Text(text) => writeln!(out, "     {key}: {text}")?,
                    FactValue::List(items) => writeln!(out, "     {key}: {}", items.join(", "))?,
                }
            }
        }
        Ok(())
    }

    fn add_intent<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> anyhow::Result<()> {
        let Some(name) = prompt(input, out, "Intent id: ")? else {
            return Ok(());
        };
        let Some(patterns) = prompt(input, out, "Patterns (comma-separated): ")? else {
            return Ok(());
        };
        let Some(responses) = prompt(input, out, "Responses (comma-separated): ")? else {
            return Ok(());
        };

        let entry = match IntentEntry::new(name.trim(), split_list(&patterns), split_list(&responses)) {
            Ok(entry) => entry,
            Err(e) => {
                writeln!(out, "Parley: {e}")?;
                return Ok(());
            }
        };

        let id = entry.name().to_string();
        let replaced = self.bot.catalog_mut().upsert(entry).is_some();
        info!(intent = %id, replaced, "Catalog edited");

        if let Some(path) = &self.catalog_path {
            if let Err(e) = self.bot.catalog().save_to_file(path) {
                warn!(error = %e, path = %path.display(), "Catalog was not saved");
                eprintln!("warning: {e}");
            }
        }
        let verb = if replaced { "Updated" } else { "Added" };
        writeln!(out, "Parley: {verb} intent '{id}'.")?;
        Ok(())
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Print `label`, then read one line. `None` at end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> anyhow::Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
