//! Startup plumbing: configuration, catalog and logging.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use parley_core::{IntentCatalog, ParleyConfig};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Command-line overrides applied on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Replaces `catalog.path`.
    pub catalog: Option<PathBuf>,
    /// Replaces `persistence.database_path`.
    pub database: Option<PathBuf>,
}

/// Load `path` if given (defaults otherwise) and apply `overrides`.
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_config(path: Option<&Path>, overrides: Overrides) -> anyhow::Result<ParleyConfig> {
    let mut config = match path {
        Some(path) => ParleyConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ParleyConfig::default(),
    };
    if let Some(catalog) = overrides.catalog {
        config.catalog.path = Some(catalog);
    }
    if let Some(database) = overrides.database {
        config.persistence.database_path = database;
    }
    Ok(config)
}

/// The configured catalog file, or the built-in catalog.
///
/// A configured path that does not exist yet is not an error: the built-in
/// catalog is used and `add intent` will create the file.
///
/// # Errors
/// Returns an error if an existing catalog file cannot be parsed.
pub fn load_catalog(config: &ParleyConfig) -> anyhow::Result<IntentCatalog> {
    let Some(path) = &config.catalog.path else {
        return Ok(IntentCatalog::builtin());
    };
    if !path.exists() {
        warn!(path = %path.display(), "Catalog file not found, using built-in intents");
        return Ok(IntentCatalog::builtin());
    }
    IntentCatalog::from_file(path)
        .with_context(|| format!("loading intent catalog from {}", path.display()))
}

/// Install the stderr subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
