//! Rate sources
//!
//! - **exchange_rates**: HTTP client for the provider's `timeseries` and `latest` endpoints
//! - **in_memory**: canned rates for tests and offline runs

pub mod exchange_rates;
pub mod in_memory;

pub use exchange_rates::ExchangeRatesClient;
pub use in_memory::InMemoryRateSource;

use super::symbol_table::{SymbolRates, SymbolTable};
use crate::error::Result;
use chrono::NaiveDate;
use hashbrown::HashMap;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Parameters shared by every rate request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateQuery {
    /// Currency every symbol is quoted against
    pub base: String,
    pub symbols: Vec<String>,
}

impl RateQuery {
    pub fn new(base: &str, symbols: Vec<String>) -> Self {
        Self {
            base: base.to_string(),
            symbols,
        }
    }

    /// Comma-separated symbol list as sent on the wire
    pub fn symbols_param(&self) -> String {
        self.symbols.join(",")
    }
}

/// Body of a successful `timeseries` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeseriesResponse {
    #[serde(default, deserialize_with = "rate_series")]
    pub rates: BTreeMap<NaiveDate, SymbolRates>,
}

impl TimeseriesResponse {
    pub fn into_symbol_table(self) -> SymbolTable {
        let mut table = SymbolTable::new();
        table.merge(self.rates);
        table
    }
}

/// Body of a successful `latest` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LatestResponse {
    #[serde(default, deserialize_with = "symbol_rates")]
    pub rates: SymbolRates,
}

/// Provider rates as sent, where a symbol may carry `null`
type RawRates = HashMap<String, Option<f64>>;

fn drop_nulls(raw: RawRates) -> SymbolRates {
    raw.into_iter()
        .filter_map(|(symbol, rate)| rate.map(|rate| (symbol, rate)))
        .collect()
}

/// Null rates are treated as absent symbols
fn symbol_rates<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<SymbolRates, D::Error> {
    let raw = Option::<RawRates>::deserialize(d)?;
    Ok(raw.map(drop_nulls).unwrap_or_default())
}

fn rate_series<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<BTreeMap<NaiveDate, SymbolRates>, D::Error> {
    let raw = Option::<BTreeMap<NaiveDate, RawRates>>::deserialize(d)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(date, rates)| (date, drop_nulls(rates)))
        .collect())
}

/// Anything able to answer rate requests
///
/// Implementations make no retries; a failed call surfaces immediately.
pub trait RateSource {
    /// Daily rates for every date in `[start, end]`, both inclusive
    fn timeseries(&self, query: &RateQuery, start: NaiveDate, end: NaiveDate) -> Result<TimeseriesResponse>;

    /// Current rates
    fn latest(&self, query: &RateQuery) -> Result<LatestResponse>;

    fn name(&self) -> &str;
}

impl<S: RateSource + ?Sized> RateSource for &S {
    fn timeseries(&self, query: &RateQuery, start: NaiveDate, end: NaiveDate) -> Result<TimeseriesResponse> {
        (**self).timeseries(query, start, end)
    }

    fn latest(&self, query: &RateQuery) -> Result<LatestResponse> {
        (**self).latest(query)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
