//! Append-only intraday snapshot log (`intraday.csv`)

use crate::error::{FxError, Result};
use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// One logged price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntradayRecord {
    #[serde(with = "second_precision")]
    pub ts: DateTime<Utc>,
    pub pair: String,
    pub price: f64,
}

impl IntradayRecord {
    /// Build a record, truncating the timestamp to whole seconds
    pub fn new(ts: DateTime<Utc>, pair: &str, price: f64) -> Self {
        Self {
            ts: ts.with_nanosecond(0).unwrap_or(ts),
            pair: pair.to_string(),
            price,
        }
    }
}

/// ISO-8601 UTC timestamps at second precision, e.g. `2024-05-01T13:45:07`
mod second_precision {
    use super::*;
    use serde::{de, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        let trimmed = raw.trim().trim_end_matches('Z');
        NaiveDateTime::parse_from_str(trimmed, FORMAT)
            .map(|naive| naive.and_utc())
            .or_else(|_| DateTime::parse_from_rfc3339(raw.trim()).map(|dt| dt.with_timezone(&Utc)))
            .map_err(|e| de::Error::custom(format!("invalid timestamp {:?}: {}", raw, e)))
    }
}

/// Handle on the intraday log file
#[derive(Debug, Clone)]
pub struct IntradayLog {
    path: PathBuf,
}

impl IntradayLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append records, writing the header only when the file is new or empty
    ///
    /// Existing rows are never rewritten.
    pub fn append(&self, records: &[IntradayRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let needs_header = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        log::info!(
            "Intraday +{} rows written to {}",
            records.len(),
            self.path.display()
        );
        Ok(records.len())
    }

    /// All records in file order; an absent log reads as empty
    pub fn read_all(&self) -> Result<Vec<IntradayRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new().from_path(&self.path)?;
        reader
            .deserialize()
            .enumerate()
            .map(|(line, row)| {
                row.map_err(|e| {
                    FxError::DataIntegrity(format!(
                        "{}: row {}: {}",
                        self.path.display(),
                        line + 1,
                        e
                    ))
                })
            })
            .collect()
    }

    /// Most recent record per pair; on equal timestamps the later row wins
    pub fn latest_per_pair(&self) -> Result<BTreeMap<String, IntradayRecord>> {
        let mut latest: BTreeMap<String, IntradayRecord> = BTreeMap::new();
        for record in self.read_all()? {
            match latest.get(&record.pair) {
                Some(current) if current.ts > record.ts => {}
                _ => {
                    latest.insert(record.pair.clone(), record);
                }
            }
        }
        Ok(latest)
    }
}
