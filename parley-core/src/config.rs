//! Configuration for the parley responder.
//!
//! Maps directly to `parley.toml`. Every field has a default, so an empty
//! file (or no file at all) yields a working configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level parley configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParleyConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Intent matching thresholds.
    #[serde(default)]
    pub matching: MatchingConfig,
    /// Sentiment scoring and reply policy.
    #[serde(default)]
    pub sentiment: SentimentConfig,
    /// Conversation context window.
    #[serde(default)]
    pub context: ContextConfig,
    /// Durable memory settings.
    #[serde(default)]
    pub persistence: PersistenceConfig,
    /// Intent catalog source.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl ParleyConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `ParleyError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::ParleyError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Thresholds used when ranking catalog patterns against user input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Minimum combined similarity for an intent to be chosen.
    #[serde(default = "default_0_3")]
    pub threshold: f32,
    /// Lower bar used when looking for near-miss suggestions.
    #[serde(default = "default_0_2")]
    pub suggestion_threshold: f32,
    /// How many near-miss patterns to offer in a clarifying question.
    #[serde(default = "default_2_usize")]
    pub suggestion_count: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            suggestion_threshold: 0.2,
            suggestion_count: 2,
        }
    }
}

/// Sentiment scoring constants and the floors that gate sentiment replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    /// Aggregate score beyond ±margin is classified positive/negative.
    #[serde(default = "default_0_4")]
    pub polarity_margin: f32,
    /// Multiplier applied to a negated term (flip and dampen).
    #[serde(default = "default_negation_factor")]
    pub negation_factor: f32,
    /// How many preceding tokens are searched for a negation word.
    #[serde(default = "default_2_usize")]
    pub negation_window: usize,
    /// Confidence needed before sentiment may drive the base reply.
    #[serde(default = "default_0_4")]
    pub reply_confidence_floor: f32,
    /// Confidence needed before a mood phrase is appended to the reply.
    #[serde(default = "default_0_5")]
    pub modifier_confidence_floor: f32,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            polarity_margin: 0.4,
            negation_factor: -0.7,
            negation_window: 2,
            reply_confidence_floor: 0.4,
            modifier_confidence_floor: 0.5,
        }
    }
}

/// How much conversation history the responder keeps and looks at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Recent turns read from memory when enriching a reply.
    #[serde(default = "default_3_usize")]
    pub lookback_turns: usize,
    /// Turn history cap; the oldest turn is evicted beyond this.
    #[serde(default = "default_100")]
    pub max_turns: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            lookback_turns: 3,
            max_turns: 100,
        }
    }
}

/// Durable memory store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// SQLite database file holding turns, facts and sessions.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Enable SQLite WAL journaling.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
        }
    }
}

/// Where the intent catalog comes from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON catalog file. The built-in catalog is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_database_path() -> PathBuf { PathBuf::from("parley.db") }
fn default_negation_factor() -> f32 { -0.7 }
fn default_0_2() -> f32 { 0.2 }
fn default_0_3() -> f32 { 0.3 }
fn default_0_4() -> f32 { 0.4 }
fn default_0_5() -> f32 { 0.5 }
fn default_2_usize() -> usize { 2 }
fn default_3_usize() -> usize { 3 }
fn default_100() -> usize { 100 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = ParleyConfig::from_toml("").expect("parse");
        assert!((config.matching.threshold - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.context.lookback_turns, 3);
        assert_eq!(config.context.max_turns, 100);
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = ParleyConfig::from_toml(
            r#"
            [matching]
            threshold = 0.25

            [context]
            lookback_turns = 5

            [catalog]
            path = "intents.json"
            "#,
        )
        .expect("parse");
        assert!((config.matching.threshold - 0.25).abs() < f32::EPSILON);
        assert_eq!(config.matching.suggestion_count, 2);
        assert_eq!(config.context.lookback_turns, 5);
        assert_eq!(config.context.max_turns, 100);
        assert_eq!(config.catalog.path, Some(PathBuf::from("intents.json")));
        assert!((config.sentiment.negation_factor + 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = ParleyConfig::from_toml("[matching\nthreshold = ").expect_err("should fail");
        assert!(matches!(err, crate::ParleyError::Config(_)));
    }
}
