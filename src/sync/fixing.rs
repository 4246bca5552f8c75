//! Incremental daily fixing update
//!
//! Fetches every date after the last stored one up to today in a single
//! request and merges it into the daily table. A date fetched again replaces
//! the stored row.

use super::{rate_query, DataPaths, StepOutcome};
use crate::config::AggregatorConfig;
use crate::data::daily::DailyTable;
use crate::data::sources::RateSource;
use crate::error::{FxError, Result};
use crate::pairs::PairRegistry;
use chrono::{Duration, NaiveDate};

/// Bring the daily table up to `today`
pub fn run(
    config: &AggregatorConfig,
    registry: &PairRegistry,
    source: &dyn RateSource,
    paths: &DataPaths,
    today: NaiveDate,
) -> Result<StepOutcome> {
    if !paths.daily.exists() {
        log::warn!("{} not found - run full history first", paths.daily.display());
        return Ok(StepOutcome::Skipped(format!(
            "{} does not exist yet; run the full history backfill first",
            paths.daily.display()
        )));
    }

    let mut table = DailyTable::read(&paths.daily)?.project(&registry.pair_names());
    let last_date = table.max_date().ok_or_else(|| {
        FxError::DataIntegrity(format!("{} has no rows", paths.daily.display()))
    })?;

    let delta_start = last_date + Duration::days(1);
    if delta_start > today {
        log::info!("No new days to update (last stored {})", last_date);
        return Ok(StepOutcome::Skipped(format!(
            "already current through {}",
            last_date
        )));
    }

    log::info!("Fetch fixings {} -> {}", delta_start, today);
    let query = rate_query(config, registry);
    let response = source.timeseries(&query, delta_start, today)?;
    if response.rates.is_empty() {
        log::info!("No rates returned for daily fixing");
        return Ok(StepOutcome::Skipped(format!(
            "no rates returned for {} -> {}",
            delta_start, today
        )));
    }

    let (fresh, missing) = registry.to_pair_table(&response.into_symbol_table());
    let stats = table.merge(&fresh);
    table.write(&paths.daily)?;

    log::info!(
        "{} updated: +{} new, {} replaced, now {} rows, {} pairs without data",
        paths.daily.display(),
        stats.appended,
        stats.replaced,
        table.len(),
        missing.len()
    );
    Ok(StepOutcome::Written {
        rows: stats.appended + stats.replaced,
    })
}
