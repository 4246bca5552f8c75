//! Calendar helpers - history windows and provider-sized date chunks

use crate::error::{FxError, Result};
use chrono::{Duration, NaiveDate, Utc};
use std::fmt;

/// One provider-bounded sub-range, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateChunk {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateChunk {
    /// Number of calendar days covered
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateChunk {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.start, self.end)
    }
}

/// Current UTC calendar date
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Backfill window of `years_back` years (365 days each) ending on `today`
///
/// Fails when the start would fall before the earliest representable date.
pub fn history_range(today: NaiveDate, years_back: u32) -> Result<(NaiveDate, NaiveDate)> {
    let start = today
        .checked_sub_signed(Duration::days(i64::from(years_back) * 365))
        .ok_or_else(|| {
            FxError::Config(format!(
                "history.years_back = {} reaches before the earliest supported date",
                years_back
            ))
        })?;
    Ok((start, today))
}

/// Split `[start, end]` into consecutive chunks of at most `max_days` days
///
/// Chunks are contiguous and non-overlapping; an inverted range yields none.
pub fn chunk_range(start: NaiveDate, end: NaiveDate, max_days: u32) -> Vec<DateChunk> {
    let span = Duration::days(i64::from(max_days.max(1)) - 1);
    let mut chunks = Vec::new();
    let mut current = start;

    while current <= end {
        let chunk_end = (current + span).min(end);
        chunks.push(DateChunk {
            start: current,
            end: chunk_end,
        });
        current = chunk_end + Duration::days(1);
    }

    chunks
}
