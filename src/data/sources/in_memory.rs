//! In-memory rate source
//!
//! Serves pre-loaded daily and latest rates without touching the network.
//! Every request is recorded, and the source can be told to fail from a given
//! call onwards, which makes it the workhorse of the pipeline tests.

use super::{LatestResponse, RateQuery, RateSource, TimeseriesResponse};
use crate::data::symbol_table::SymbolRates;
use crate::error::{FxError, Result};
use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// A request seen by [`InMemoryRateSource`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    Timeseries { start: NaiveDate, end: NaiveDate, symbols: Vec<String> },
    Latest { symbols: Vec<String> },
}

/// Rate source backed by maps
#[derive(Debug, Default)]
pub struct InMemoryRateSource {
    daily: BTreeMap<NaiveDate, SymbolRates>,
    latest: SymbolRates,
    fail_from_call: Option<usize>,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl InMemoryRateSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or overwrite one daily rate
    pub fn add_rate(&mut self, date: NaiveDate, symbol: &str, rate: f64) {
        self.daily
            .entry(date)
            .or_default()
            .insert(symbol.to_string(), rate);
    }

    pub fn set_latest(&mut self, symbol: &str, rate: f64) {
        self.latest.insert(symbol.to_string(), rate);
    }

    pub fn clear_latest(&mut self) {
        self.latest.clear();
    }

    /// Fail every request from the `n`-th onwards (0-based) with a transport error
    pub fn fail_from_call(&mut self, n: usize) {
        self.fail_from_call = Some(n);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    fn record(&self, request: RecordedRequest) -> Result<()> {
        let mut requests = self.requests.borrow_mut();
        let index = requests.len();
        requests.push(request);

        match self.fail_from_call {
            Some(n) if index >= n => Err(FxError::Transport(format!(
                "simulated connection failure on request {}",
                index
            ))),
            _ => Ok(()),
        }
    }
}

impl RateSource for InMemoryRateSource {
    fn timeseries(&self, query: &RateQuery, start: NaiveDate, end: NaiveDate) -> Result<TimeseriesResponse> {
        self.record(RecordedRequest::Timeseries {
            start,
            end,
            symbols: query.symbols.clone(),
        })?;

        let rates = self
            .daily
            .range(start..=end)
            .map(|(date, rates)| (*date, filter_symbols(rates, &query.symbols)))
            .collect();
        Ok(TimeseriesResponse { rates })
    }

    fn latest(&self, query: &RateQuery) -> Result<LatestResponse> {
        self.record(RecordedRequest::Latest {
            symbols: query.symbols.clone(),
        })?;

        Ok(LatestResponse {
            rates: filter_symbols(&self.latest, &query.symbols),
        })
    }

    fn name(&self) -> &str {
        "in_memory"
    }
}

fn filter_symbols(rates: &SymbolRates, symbols: &[String]) -> SymbolRates {
    rates
        .iter()
        .filter(|(symbol, _)| symbols.contains(*symbol))
        .map(|(symbol, rate)| (symbol.clone(), *rate))
        .collect()
}
