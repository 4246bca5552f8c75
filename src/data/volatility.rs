//! Long-format realized volatility table (`volatility.csv`)

use super::atomic::write_atomic;
use crate::error::{FxError, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Annualized realized volatility of one pair on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityRow {
    pub date: NaiveDate,
    pub pair: String,
    pub rv_30: Option<f64>,
    pub rv_60: Option<f64>,
    pub rv_90: Option<f64>,
    pub rv_180: Option<f64>,
    pub rv_250: Option<f64>,
}

impl VolatilityRow {
    /// Value for a trailing window, if that window is tracked
    pub fn window(&self, window: usize) -> Option<f64> {
        match window {
            30 => self.rv_30,
            60 => self.rv_60,
            90 => self.rv_90,
            180 => self.rv_180,
            250 => self.rv_250,
            _ => None,
        }
    }
}

/// Full volatility table, sorted by `(date, pair)`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolatilityTable {
    rows: Vec<VolatilityRow>,
}

impl VolatilityTable {
    pub fn new(mut rows: Vec<VolatilityRow>) -> Self {
        rows.sort_by(|a, b| (a.date, &a.pair).cmp(&(b.date, &b.pair)));
        Self { rows }
    }

    pub fn rows(&self) -> &[VolatilityRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows for one pair in date order
    pub fn for_pair<'a>(&'a self, pair: &'a str) -> impl Iterator<Item = &'a VolatilityRow> + 'a {
        self.rows.iter().filter(move |row| row.pair == pair)
    }

    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        if self.rows.is_empty() {
            writer.write_record(["date", "pair", "rv_30", "rv_60", "rv_90", "rv_180", "rv_250"])?;
        }
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.into_inner().map_err(|e| FxError::Io(e.into_error()))
    }

    /// Replace the file at `path` with this table
    pub fn write(&self, path: &Path) -> Result<()> {
        write_atomic(path, &self.to_csv()?)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let mut reader = ReaderBuilder::new().from_path(path)?;
        let rows = reader
            .deserialize()
            .collect::<std::result::Result<Vec<VolatilityRow>, csv::Error>>()
            .map_err(|e| FxError::DataIntegrity(format!("{}: {}", path.display(), e)))?;
        Ok(Self::new(rows))
    }
}
