//! Persisted tables and rate sources
//!
//! # Components
//!
//! - **daily**: authoritative date x pair price table (`daily.csv`)
//! - **intraday**: append-only snapshot log (`intraday.csv`)
//! - **volatility**: long-format realized volatility (`volatility.csv`)
//! - **symbol_table**: provider rates keyed by date and symbol
//! - **sources**: rate sources (HTTP and in-memory)
//! - **atomic**: all-or-nothing file replacement

pub mod atomic;
pub mod daily;
pub mod intraday;
pub mod sources;
pub mod symbol_table;
pub mod volatility;

pub use daily::{DailyTable, MergeStats};
pub use intraday::{IntradayLog, IntradayRecord};
pub use sources::{ExchangeRatesClient, InMemoryRateSource, RateQuery, RateSource};
pub use symbol_table::{SymbolRates, SymbolTable};
pub use volatility::{VolatilityRow, VolatilityTable};
