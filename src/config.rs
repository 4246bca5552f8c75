//! Aggregator configuration
//!
//! The configuration is an explicit value handed to every pipeline step.
//! It is normally read from a TOML file:
//!
//! ```toml
//! data_dir = "data"
//!
//! [api]
//! base_url = "https://api.apilayer.com/exchangerates_data"
//! base_currency = "USD"
//!
//! [history]
//! years_back = 5
//!
//! [[pairs]]
//! name = "EURUSD"
//! base = "USD"
//! quote = "EUR"
//!
//! [[pairs]]
//! name = "USDJPY"
//! base = "JPY"
//! quote = "USD"
//! invert = true
//! ```

use crate::error::{FxError, Result};
use crate::pairs::Pair;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum inclusive window (in days) the provider accepts per timeseries request
pub const PROVIDER_MAX_WINDOW_DAYS: u32 = 365;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    pub pairs: Vec<Pair>,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// Provider endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub base_currency: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Backfill settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_years_back")]
    pub years_back: u32,
    /// Chunk length in days, both ends inclusive
    #[serde(default = "default_chunk_days")]
    pub chunk_days: u32,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_years_back() -> u32 {
    5
}

fn default_chunk_days() -> u32 {
    PROVIDER_MAX_WINDOW_DAYS
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            years_back: default_years_back(),
            chunk_days: default_chunk_days(),
        }
    }
}

impl AggregatorConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AggregatorConfig =
            toml::from_str(contents).map_err(|e| FxError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            FxError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Check invariants the pipeline relies on
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(FxError::Config("api.base_url must not be empty".to_string()));
        }
        if self.api.base_currency.trim().is_empty() {
            return Err(FxError::Config(
                "api.base_currency must not be empty".to_string(),
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(FxError::Config("api.timeout_secs must be positive".to_string()));
        }
        if self.history.years_back == 0 {
            return Err(FxError::Config(
                "history.years_back must be positive".to_string(),
            ));
        }
        if self.history.chunk_days == 0 || self.history.chunk_days > PROVIDER_MAX_WINDOW_DAYS {
            return Err(FxError::Config(format!(
                "history.chunk_days must be within 1..={}, got {}",
                PROVIDER_MAX_WINDOW_DAYS, self.history.chunk_days
            )));
        }
        if self.pairs.is_empty() {
            return Err(FxError::Config("at least one pair is required".to_string()));
        }

        let mut seen = HashSet::new();
        for pair in &self.pairs {
            if pair.name.trim().is_empty() || pair.base.trim().is_empty() || pair.quote.trim().is_empty() {
                return Err(FxError::Config(format!(
                    "pair {:?} has an empty name or symbol",
                    pair.name
                )));
            }
            if !seen.insert(pair.name.as_str()) {
                return Err(FxError::Config(format!("duplicate pair name: {}", pair.name)));
            }
        }

        Ok(())
    }
}
