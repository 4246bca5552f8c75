//! Daily table - one row per date, one column per pair
//!
//! Persisted as `daily.csv`: a `date` column (ISO-8601) followed by one column
//! per pair. Empty cells are missing prices. Rows are only ever appended or
//! replaced for a given date, never removed.

use super::atomic::write_atomic;
use crate::error::{FxError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::BTreeMap;
use std::path::Path;

const DATE_COLUMN: &str = "date";

/// Counts reported by [`DailyTable::merge`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Dates that were not in the table before
    pub appended: usize,
    /// Dates whose row was replaced by the incoming one
    pub replaced: usize,
}

/// Date-indexed price table
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTable {
    columns: Vec<String>,
    rows: BTreeMap<NaiveDate, Vec<Option<f64>>>,
}

impl DailyTable {
    /// Create an empty table with the given pair columns
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: BTreeMap::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.keys().copied().collect()
    }

    pub fn max_date(&self) -> Option<NaiveDate> {
        self.rows.keys().next_back().copied()
    }

    /// Insert or replace the row for `date`; values follow column order
    pub fn upsert_row(&mut self, date: NaiveDate, mut values: Vec<Option<f64>>) -> bool {
        values.resize(self.columns.len(), None);
        self.rows.insert(date, values).is_some()
    }

    pub fn row(&self, date: NaiveDate) -> Option<&[Option<f64>]> {
        self.rows.get(&date).map(|v| v.as_slice())
    }

    pub fn get(&self, date: NaiveDate, column: &str) -> Option<f64> {
        let idx = self.column_index(column)?;
        self.rows.get(&date)?[idx]
    }

    /// Full column in ascending date order
    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.column_index(name)?;
        Some(self.rows.values().map(|row| row[idx]).collect())
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Merge `other` into this table, newest wins
    ///
    /// A date present in both tables takes the whole row from `other`.
    /// Columns of `other` unknown to this table are ignored; columns it
    /// lacks are missing in the replaced row.
    pub fn merge(&mut self, other: &DailyTable) -> MergeStats {
        let mapping: Vec<Option<usize>> = self
            .columns
            .iter()
            .map(|c| other.column_index(c))
            .collect();

        let mut stats = MergeStats::default();
        for (date, incoming) in &other.rows {
            let row = mapping
                .iter()
                .map(|idx| idx.and_then(|i| incoming[i]))
                .collect();
            if self.upsert_row(*date, row) {
                stats.replaced += 1;
            } else {
                stats.appended += 1;
            }
        }
        stats
    }

    /// Re-shape to exactly `names`, dropping stray columns and adding missing ones
    pub fn project(&self, names: &[String]) -> DailyTable {
        for stray in self.columns.iter().filter(|c| !names.contains(*c)) {
            log::warn!("Dropping unexpected column {} from daily table", stray);
        }
        for absent in names.iter().filter(|n| !self.columns.contains(*n)) {
            log::warn!("Column {} missing from daily table, filling with blanks", absent);
        }

        let mut projected = DailyTable::new(names.to_vec());
        projected.merge(self);
        projected
    }

    /// Load a table from CSV; unparsable cells become missing values
    pub fn read(path: &Path) -> Result<Self> {
        let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;
        let headers = reader.headers()?.clone();

        let date_idx = headers
            .iter()
            .position(|h| h.trim() == DATE_COLUMN)
            .ok_or_else(|| {
                FxError::DataIntegrity(format!(
                    "{} has no '{}' column",
                    path.display(),
                    DATE_COLUMN
                ))
            })?;

        let value_idx: Vec<usize> = (0..headers.len()).filter(|&i| i != date_idx).collect();
        let columns = value_idx
            .iter()
            .map(|&i| headers[i].trim().to_string())
            .collect();
        let mut table = DailyTable::new(columns);

        for (line, record) in reader.records().enumerate() {
            let record = record?;
            let raw_date = record.get(date_idx).unwrap_or("");
            let date = parse_date(raw_date).ok_or_else(|| {
                FxError::DataIntegrity(format!(
                    "{}: invalid date {:?} on row {}",
                    path.display(),
                    raw_date,
                    line + 1
                ))
            })?;

            let values = value_idx
                .iter()
                .map(|&i| record.get(i).and_then(parse_price))
                .collect();
            table.upsert_row(date, values);
        }

        Ok(table)
    }

    /// Serialize to CSV bytes
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());

        let mut header = Vec::with_capacity(self.columns.len() + 1);
        header.push(DATE_COLUMN.to_string());
        header.extend(self.columns.iter().cloned());
        writer.write_record(&header)?;

        for (date, values) in &self.rows {
            let mut record = Vec::with_capacity(values.len() + 1);
            record.push(date.format("%Y-%m-%d").to_string());
            record.extend(values.iter().map(|v| v.map(|x| x.to_string()).unwrap_or_default()));
            writer.write_record(&record)?;
        }

        writer.into_inner().map_err(|e| FxError::Io(e.into_error()))
    }

    /// Atomically replace the file at `path` with this table
    pub fn write(&self, path: &Path) -> Result<()> {
        write_atomic(path, &self.to_csv()?)
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
