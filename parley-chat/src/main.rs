//! `parley`: chat with the rule-based responder from a terminal.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use parley_chat::setup::{self, Overrides};
use parley_chat::Repl;
use parley_core::choice::{Chooser, RandomChooser};
use parley_core::sentiment::Lexicon;
use parley_core::{DialogueManager, InMemoryStore, MemoryStore, ParleyConfig, SqliteStore};
use tracing::info;

/// Parley - rule-based conversational responder
#[derive(Parser)]
#[command(name = "parley")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chat with a rule-based responder that remembers you")]
struct Args {
    /// TOML configuration file
    #[arg(long, env = "PARLEY_CONFIG")]
    config: Option<PathBuf>,

    /// JSON intent catalog (overrides the config file)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// SQLite memory database (overrides the config file)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Keep memory in this process only
    #[arg(long, conflicts_with = "database")]
    ephemeral: bool,

    /// Seed for reply selection, for reproducible sessions
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = setup::load_config(
        args.config.as_deref(),
        Overrides {
            catalog: args.catalog,
            database: args.database,
        },
    )?;
    setup::init_logging(&config.general.log_level);

    let chooser = args.seed.map_or_else(RandomChooser::from_entropy, RandomChooser::seeded);
    let max_turns = config.context.max_turns;

    if args.ephemeral {
        chat(config, InMemoryStore::new(max_turns), chooser)
    } else {
        let path = config.persistence.database_path.clone();
        let store = SqliteStore::open(&path, &config.persistence, max_turns)
            .with_context(|| format!("opening memory database {}", path.display()))?;
        chat(config, store, chooser)
    }
}

fn chat<S: MemoryStore, C: Chooser>(
    config: ParleyConfig,
    mut store: S,
    chooser: C,
) -> anyhow::Result<()> {
    let catalog = setup::load_catalog(&config)?;
    let session = store.start_session().context("starting a new session")?;
    info!(%session, intents = catalog.len(), "Chat session started");

    let catalog_path = config.catalog.path.clone();
    let bot = DialogueManager::new(Arc::new(catalog), &Lexicon::default(), config, store, chooser)?;

    let mut repl = Repl::new(bot, catalog_path);
    repl.run(&mut io::stdin().lock(), &mut io::stdout().lock())
}
