//! Pair registry - maps configured currency pairs onto provider symbols
//!
//! The provider quotes every symbol against a single base currency. A pair is
//! priced either directly from its quote symbol, or as the reciprocal of its
//! base symbol when `invert` is set.

use crate::data::daily::DailyTable;
use crate::data::symbol_table::{SymbolRates, SymbolTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A configured currency pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    /// Unique display key, e.g. "EURUSD"
    pub name: String,
    pub base: String,
    pub quote: String,
    #[serde(default)]
    pub invert: bool,
}

impl Pair {
    pub fn new(name: &str, base: &str, quote: &str, invert: bool) -> Self {
        Self {
            name: name.to_string(),
            base: base.to_string(),
            quote: quote.to_string(),
            invert,
        }
    }

    /// Symbol requested from the provider to price this pair
    pub fn underlying_symbol(&self) -> &str {
        if self.invert {
            &self.base
        } else {
            &self.quote
        }
    }

    /// Pair price from the provider rate of the underlying symbol
    ///
    /// Non-finite and non-positive rates have no meaningful price and map to `None`.
    pub fn price_from_rate(&self, rate: f64) -> Option<f64> {
        if !rate.is_finite() || rate <= 0.0 {
            return None;
        }
        if self.invert {
            Some(1.0 / rate)
        } else {
            Some(rate)
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({}/{}", self.name, self.base, self.quote)?;
        if self.invert {
            write!(f, ", inverted")?;
        }
        write!(f, ")")
    }
}

/// A pair whose underlying symbol was absent from a provider response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingSymbol {
    pub pair: String,
    pub symbol: String,
}

/// Ordered set of configured pairs
#[derive(Debug, Clone)]
pub struct PairRegistry {
    pairs: Vec<Pair>,
}

impl PairRegistry {
    pub fn new(pairs: Vec<Pair>) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    /// Pair display names in configuration order
    pub fn pair_names(&self) -> Vec<String> {
        self.pairs.iter().map(|p| p.name.clone()).collect()
    }

    /// Deduplicated, sorted provider symbols needed to price every pair
    pub fn symbols(&self) -> Vec<String> {
        self.pairs
            .iter()
            .map(|p| p.underlying_symbol().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Project a symbol-indexed table into pair space
    ///
    /// Pairs whose symbol never appears in `symbols` get an all-missing
    /// column and are reported back; the remaining pairs are unaffected.
    pub fn to_pair_table(&self, symbols: &SymbolTable) -> (DailyTable, Vec<MissingSymbol>) {
        let present = symbols.symbols();
        let mut missing = Vec::new();

        for pair in &self.pairs {
            if !present.contains(pair.underlying_symbol()) {
                log::warn!(
                    "Symbol {} not in API data for pair {}",
                    pair.underlying_symbol(),
                    pair.name
                );
                missing.push(MissingSymbol {
                    pair: pair.name.clone(),
                    symbol: pair.underlying_symbol().to_string(),
                });
            }
        }

        let mut table = DailyTable::new(self.pair_names());
        for (date, rates) in symbols.iter() {
            let row = self
                .pairs
                .iter()
                .map(|pair| {
                    rates
                        .get(pair.underlying_symbol())
                        .and_then(|&rate| pair.price_from_rate(rate))
                })
                .collect();
            table.upsert_row(*date, row);
        }

        (table, missing)
    }

    /// Price every pair whose symbol is present in a single snapshot
    ///
    /// Pairs without a usable rate are skipped.
    pub fn price_snapshot(&self, rates: &SymbolRates) -> Vec<(String, f64)> {
        self.pairs
            .iter()
            .filter_map(|pair| {
                let rate = *rates.get(pair.underlying_symbol())?;
                pair.price_from_rate(rate).map(|price| (pair.name.clone(), price))
            })
            .collect()
    }
}
