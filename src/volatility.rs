//! Realized volatility engine
//!
//! Log returns `r[t] = ln(p[t] / p[t-1])` are taken row-over-row from the daily
//! table, then a trailing-window sample standard deviation is annualized with
//! `sqrt(252)`. A window produces a value only when all of its `window` trailing
//! returns are present.

use crate::data::daily::DailyTable;
use crate::data::volatility::{VolatilityRow, VolatilityTable};
use crate::error::{FxError, Result};
use crate::pairs::PairRegistry;
use crate::sync::{DataPaths, StepOutcome};
use statrs::statistics::Statistics;

/// Trailing windows, in trading days
pub const VOL_WINDOWS: [usize; 5] = [30, 60, 90, 180, 250];

/// Trading days per year used for annualization
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Row-over-row log returns; the first entry is always `None`
pub fn log_returns(prices: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut returns = Vec::with_capacity(prices.len());
    let mut prev: Option<f64> = None;

    for (i, &price) in prices.iter().enumerate() {
        let ret = if i == 0 {
            None
        } else {
            match (prev, price) {
                (Some(p0), Some(p1)) if p0 > 0.0 && p1 > 0.0 => {
                    Some((p1 / p0).ln()).filter(|r| r.is_finite())
                }
                _ => None,
            }
        };
        returns.push(ret);
        prev = price;
    }

    returns
}

/// Trailing sample standard deviation over exactly `window` observations
///
/// Any gap inside the window leaves that position empty. Windows shorter than
/// two observations have no sample deviation.
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window < 2 {
        return vec![None; values.len()];
    }

    let mut out = vec![None; values.len()];
    let mut buffer = Vec::with_capacity(window);

    for end in (window - 1)..values.len() {
        buffer.clear();
        buffer.extend(values[end + 1 - window..=end].iter().map_while(|v| *v));
        if buffer.len() == window {
            out[end] = Some(buffer.iter().std_dev());
        }
    }

    out
}

/// Computes the long-format volatility table from daily prices
#[derive(Debug, Clone)]
pub struct VolatilityEngine {
    annualization_factor: f64,
}

impl VolatilityEngine {
    pub fn new(periods_per_year: f64) -> Self {
        Self {
            annualization_factor: periods_per_year.sqrt(),
        }
    }

    /// Annualized rolling volatility for a single price series
    pub fn annualized(&self, prices: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
        rolling_std(&log_returns(prices), window)
            .into_iter()
            .map(|sd| sd.map(|v| v * self.annualization_factor))
            .collect()
    }

    /// Most recent annualized volatility for a window
    ///
    /// Fails when the series is shorter than `window + 1` prices, or when the
    /// latest window has gaps.
    pub fn latest(&self, prices: &[Option<f64>], window: usize) -> Result<f64> {
        let available = prices.len().saturating_sub(1);
        if available < window {
            return Err(FxError::InsufficientData {
                required: window,
                available,
            });
        }

        let returns = log_returns(prices);
        let present = returns.iter().rev().take_while(|r| r.is_some()).count();
        self.annualized(prices, window)
            .last()
            .copied()
            .flatten()
            .ok_or(FxError::InsufficientData {
                required: window,
                available: present,
            })
    }

    /// One row per `(date, pair)` for every date in the table
    pub fn compute(&self, table: &DailyTable) -> VolatilityTable {
        let dates = table.dates();
        let mut rows = Vec::with_capacity(dates.len() * table.columns().len());

        for pair in table.columns() {
            let prices = table.column(pair).unwrap_or_default();
            let series: Vec<Vec<Option<f64>>> = VOL_WINDOWS
                .iter()
                .map(|&w| self.annualized(&prices, w))
                .collect();

            for (i, date) in dates.iter().enumerate() {
                rows.push(VolatilityRow {
                    date: *date,
                    pair: pair.clone(),
                    rv_30: series[0][i],
                    rv_60: series[1][i],
                    rv_90: series[2][i],
                    rv_180: series[3][i],
                    rv_250: series[4][i],
                });
            }
        }

        VolatilityTable::new(rows)
    }
}

impl Default for VolatilityEngine {
    fn default() -> Self {
        Self::new(TRADING_DAYS_PER_YEAR)
    }
}

/// Regenerate `volatility.csv` from `daily.csv`
pub fn run(registry: &PairRegistry, paths: &DataPaths) -> Result<StepOutcome> {
    if !paths.daily.exists() {
        log::warn!("{} not found - run full history first", paths.daily.display());
        return Ok(StepOutcome::Skipped(format!(
            "{} does not exist yet; run the full history backfill first",
            paths.daily.display()
        )));
    }

    let daily = DailyTable::read(&paths.daily)?.project(&registry.pair_names());
    let table = VolatilityEngine::default().compute(&daily);
    table.write(&paths.volatility)?;

    log::info!(
        "Saved {} ({} rows x {} pairs)",
        paths.volatility.display(),
        daily.len(),
        daily.columns().len()
    );
    Ok(StepOutcome::Written { rows: table.len() })
}
