//! Data synchronization pipeline
//!
//! Each step takes its configuration explicitly and runs to completion or
//! fails without touching previously persisted state:
//!
//! - **backfill**: chunked multi-year history, written once
//! - **fixing**: incremental update merged into the daily table
//! - **snapshot**: one latest-rate row per pair appended to the intraday log
//!
//! Volatility regeneration lives in [`crate::volatility`].

pub mod backfill;
pub mod fixing;
pub mod snapshot;

use crate::calendar::today_utc;
use crate::config::AggregatorConfig;
use crate::data::sources::{RateQuery, RateSource};
use crate::error::Result;
use crate::pairs::PairRegistry;
use chrono::Utc;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const DAILY_FILE: &str = "daily.csv";
pub const INTRADAY_FILE: &str = "intraday.csv";
pub const VOLATILITY_FILE: &str = "volatility.csv";

/// Locations of the three persisted tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub dir: PathBuf,
    pub daily: PathBuf,
    pub intraday: PathBuf,
    pub volatility: PathBuf,
}

impl DataPaths {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            dir: dir.to_path_buf(),
            daily: dir.join(DAILY_FILE),
            intraday: dir.join(INTRADAY_FILE),
            volatility: dir.join(VOLATILITY_FILE),
        }
    }

    /// Create the data directory if needed
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }
}

/// What a pipeline step did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Rows written (daily rows, appended log rows, or volatility rows)
    Written { rows: usize },
    /// Nothing to do; the reason is meant for the user
    Skipped(String),
}

impl StepOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, StepOutcome::Skipped(_))
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StepOutcome::Written { rows } => write!(f, "{} rows written", rows),
            StepOutcome::Skipped(reason) => write!(f, "skipped: {}", reason),
        }
    }
}

/// Query for every symbol the configured pairs need
pub(crate) fn rate_query(config: &AggregatorConfig, registry: &PairRegistry) -> RateQuery {
    RateQuery::new(&config.api.base_currency, registry.symbols())
}

/// Bundles configuration, a rate source and data paths
pub struct Pipeline<S: RateSource> {
    config: AggregatorConfig,
    registry: PairRegistry,
    source: S,
    paths: DataPaths,
}

impl<S: RateSource> Pipeline<S> {
    /// Validate the configuration and use its `data_dir`
    pub fn new(config: AggregatorConfig, source: S) -> Result<Self> {
        let paths = DataPaths::new(&config.data_dir);
        Self::with_paths(config, source, paths)
    }

    pub fn with_paths(config: AggregatorConfig, source: S, paths: DataPaths) -> Result<Self> {
        config.validate()?;
        let registry = PairRegistry::new(config.pairs.clone());
        Ok(Self {
            config,
            registry,
            source,
            paths,
        })
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &PairRegistry {
        &self.registry
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    pub fn full_history(&self) -> Result<StepOutcome> {
        backfill::run(&self.config, &self.registry, &self.source, &self.paths, today_utc())
    }

    pub fn daily_fixing(&self) -> Result<StepOutcome> {
        fixing::run(&self.config, &self.registry, &self.source, &self.paths, today_utc())
    }

    pub fn intraday_snapshot(&self) -> Result<StepOutcome> {
        snapshot::run(&self.config, &self.registry, &self.source, &self.paths, Utc::now())
    }

    pub fn volatility(&self) -> Result<StepOutcome> {
        crate::volatility::run(&self.registry, &self.paths)
    }
}
