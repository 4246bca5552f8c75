//! Historical backfill
//!
//! Runs only while no daily table exists. The history window is fetched chunk
//! by chunk, strictly in order; any failed chunk aborts the whole run before
//! anything is written.

use super::{rate_query, DataPaths, StepOutcome};
use crate::calendar::{chunk_range, history_range};
use crate::config::AggregatorConfig;
use crate::data::sources::RateSource;
use crate::data::symbol_table::SymbolTable;
use crate::error::{FxError, Result};
use crate::pairs::PairRegistry;
use chrono::NaiveDate;

/// Fetch and persist the full history ending on `today`
pub fn run(
    config: &AggregatorConfig,
    registry: &PairRegistry,
    source: &dyn RateSource,
    paths: &DataPaths,
    today: NaiveDate,
) -> Result<StepOutcome> {
    paths.ensure_dir()?;
    if paths.daily.exists() {
        log::info!("{} exists - skip full history", paths.daily.display());
        return Ok(StepOutcome::Skipped(format!(
            "{} already exists",
            paths.daily.display()
        )));
    }

    let (start, end) = history_range(today, config.history.years_back)?;
    let chunks = chunk_range(start, end, config.history.chunk_days);
    let query = rate_query(config, registry);
    log::info!(
        "Fetch history {} -> {} in {} chunks from {}",
        start,
        end,
        chunks.len(),
        source.name()
    );

    let mut merged = SymbolTable::new();
    for (i, chunk) in chunks.iter().enumerate() {
        log::info!("Chunk {}/{}: {}", i + 1, chunks.len(), chunk);
        let response = source.timeseries(&query, chunk.start, chunk.end)?;
        merged.merge(response.rates);
    }

    if merged.is_empty() {
        return Err(FxError::DataIntegrity(format!(
            "no data returned from API for {} -> {}",
            start, end
        )));
    }

    let (table, missing) = registry.to_pair_table(&merged);
    table.write(&paths.daily)?;

    log::info!(
        "Saved {} shape ({}, {}), {} pairs without data",
        paths.daily.display(),
        table.len(),
        table.columns().len(),
        missing.len()
    );
    Ok(StepOutcome::Written { rows: table.len() })
}
