//! Symbol-indexed rate table, as returned by the provider

use chrono::NaiveDate;
use hashbrown::{HashMap, HashSet};
use std::collections::BTreeMap;

/// Provider rates for one date: symbol -> rate against the base currency
pub type SymbolRates = HashMap<String, f64>;

/// Date-sorted collection of per-date symbol rates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    rows: BTreeMap<NaiveDate, SymbolRates>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one date's rates; symbols already present for that date are overwritten
    pub fn merge_date(&mut self, date: NaiveDate, rates: SymbolRates) {
        self.rows.entry(date).or_default().extend(rates);
    }

    /// Merge every date of another table
    pub fn merge(&mut self, other: impl IntoIterator<Item = (NaiveDate, SymbolRates)>) {
        for (date, rates) in other {
            self.merge_date(date, rates);
        }
    }

    /// Every symbol seen on any date
    pub fn symbols(&self) -> HashSet<&str> {
        self.rows
            .values()
            .flat_map(|rates| rates.keys().map(String::as_str))
            .collect()
    }

    pub fn get(&self, date: NaiveDate, symbol: &str) -> Option<f64> {
        self.rows.get(&date)?.get(symbol).copied()
    }

    /// Iterate in ascending date order
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &SymbolRates)> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.keys().next_back().copied()
    }
}
