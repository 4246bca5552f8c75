//! Intraday snapshot appender

use super::{rate_query, DataPaths, StepOutcome};
use crate::config::AggregatorConfig;
use crate::data::intraday::{IntradayLog, IntradayRecord};
use crate::data::sources::RateSource;
use crate::error::Result;
use crate::pairs::PairRegistry;
use chrono::{DateTime, Utc};

/// Append one row per priced pair, stamped with `now`
pub fn run(
    config: &AggregatorConfig,
    registry: &PairRegistry,
    source: &dyn RateSource,
    paths: &DataPaths,
    now: DateTime<Utc>,
) -> Result<StepOutcome> {
    paths.ensure_dir()?;

    let query = rate_query(config, registry);
    let response = source.latest(&query)?;
    if response.rates.is_empty() {
        log::info!("No intraday rates returned");
        return Ok(StepOutcome::Skipped("no intraday rates returned".to_string()));
    }

    let records: Vec<IntradayRecord> = registry
        .price_snapshot(&response.rates)
        .into_iter()
        .map(|(pair, price)| IntradayRecord::new(now, &pair, price))
        .collect();

    if records.is_empty() {
        return Ok(StepOutcome::Skipped(
            "no configured pair could be priced from the snapshot".to_string(),
        ));
    }

    let rows = IntradayLog::new(&paths.intraday).append(&records)?;
    Ok(StepOutcome::Written { rows })
}
