//! # FX Aggregator
//!
//! Maintains a local store of foreign-exchange rates pulled from an exchange
//! rates API, and derives rolling realized volatility from it.
//!
//! Three flat tables live in the data directory:
//!
//! - `daily.csv`: one fixing per date and pair, built by a chunked backfill and
//!   kept current by incremental updates
//! - `intraday.csv`: append-only latest-rate snapshots
//! - `volatility.csv`: annualized 30/60/90/180/250-day realized volatility,
//!   regenerated from `daily.csv`
//!
//! ## Example
//!
//! ```rust,no_run
//! use fx_aggregator::prelude::*;
//! use std::path::Path;
//!
//! let config = AggregatorConfig::load(Path::new("config.toml"))?;
//! let client = ExchangeRatesClient::new(&config.api, "my-api-key".to_string())?;
//! let pipeline = Pipeline::new(config, client)?;
//!
//! pipeline.full_history()?;
//! pipeline.daily_fixing()?;
//! pipeline.volatility()?;
//! # Ok::<(), fx_aggregator::error::FxError>(())
//! ```

pub mod calendar;
pub mod config;
pub mod data;
pub mod error;
pub mod pairs;
pub mod sync;
pub mod volatility;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::config::{AggregatorConfig, ApiConfig, HistoryConfig};
    pub use crate::data::{
        DailyTable, ExchangeRatesClient, InMemoryRateSource, IntradayLog, IntradayRecord,
        RateQuery, RateSource, VolatilityRow, VolatilityTable,
    };
    pub use crate::error::{FxError, Result};
    pub use crate::pairs::{Pair, PairRegistry};
    pub use crate::sync::{DataPaths, Pipeline, StepOutcome};
    pub use crate::volatility::{VolatilityEngine, VOL_WINDOWS};
}
