//! Per-day rows and the result table, with CSV persistence.
//!
//! Files are written to a `.tmp` sibling and promoted into place, so a crash mid-write
//! leaves the previous table intact. Reading accepts older layouts: no `Sample Size`
//! column, extra columns such as a leading unnamed index, and integers in float notation.

use crate::fetch::STATUS_OK;
use crate::util::{create_with_backoff, open_with_backoff, replace_file_atomic_backoff};
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    #[serde(rename = "Retrieval Time", deserialize_with = "int_from_number")]
    pub retrieval_time: i64,
    #[serde(rename = "Comment Length")]
    pub comment_length: f64,
    #[serde(rename = "Word Length")]
    pub word_length: f64,
    #[serde(rename = "Response Code", deserialize_with = "int_from_number")]
    pub response_code: u16,
    #[serde(rename = "Sample Size", default, deserialize_with = "int_from_number")]
    pub sample_size: u32,
}

impl DayRecord {
    pub fn is_success(&self) -> bool {
        self.response_code == STATUS_OK
    }
}

/// Accept `200`, `200.0` and `1.6e9` for integer columns.
fn int_from_number<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let raw = String::deserialize(d)?;
    let raw = raw.trim();
    let n = match raw.parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            let f: f64 = raw.parse().map_err(serde::de::Error::custom)?;
            if !f.is_finite() || f.fract() != 0.0 {
                return Err(serde::de::Error::custom(format!("expected an integer, got {raw}")));
            }
            f as i64
        }
    };
    T::try_from(n).map_err(|_| serde::de::Error::custom(format!("{n} out of range")))
}

/// Ordered rows, one per sampled day.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultTable {
    rows: Vec<DayRecord>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_capacity(n: usize) -> Self {
        Self { rows: Vec::with_capacity(n) }
    }
    pub fn push(&mut self, rec: DayRecord) {
        self.rows.push(rec);
    }
    pub fn rows(&self) -> &[DayRecord] {
        &self.rows
    }
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose fetch returned 200, in order.
    pub fn successful(&self) -> ResultTable {
        Self { rows: self.rows.iter().filter(|r| r.is_success()).cloned().collect() }
    }

    pub fn retrieval_times(&self) -> Vec<i64> {
        self.rows.iter().map(|r| r.retrieval_time).collect()
    }
    pub fn comment_lengths(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.comment_length).collect()
    }
    pub fn word_lengths(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.word_length).collect()
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let tmp = path.with_extension("csv.tmp");
        {
            let f = create_with_backoff(&tmp, 16, 50).with_context(|| format!("create {}", tmp.display()))?;
            let mut w = csv::Writer::from_writer(BufWriter::new(f));
            for row in &self.rows {
                w.serialize(row)?;
            }
            // Header is emitted with the first row; write it explicitly for an empty table.
            if self.rows.is_empty() {
                w.write_record(["Retrieval Time", "Comment Length", "Word Length", "Response Code", "Sample Size"])?;
            }
            let mut inner = w.into_inner().map_err(|e| anyhow::anyhow!("flush {}: {}", tmp.display(), e.error()))?;
            inner.flush()?;
        }
        replace_file_atomic_backoff(&tmp, path)?;
        tracing::info!("Wrote {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }

    pub fn read_csv(path: &Path) -> Result<Self> {
        let f = open_with_backoff(path, 16, 50).with_context(|| format!("open {}", path.display()))?;
        let mut r = csv::Reader::from_reader(BufReader::new(f));
        let mut rows = Vec::new();
        for (i, rec) in r.deserialize::<DayRecord>().enumerate() {
            let rec = rec.with_context(|| format!("{}: row {}", path.display(), i + 1))?;
            rows.push(rec);
        }
        tracing::debug!("Loaded {} rows from {}", rows.len(), path.display());
        Ok(Self { rows })
    }
}

impl FromIterator<DayRecord> for ResultTable {
    fn from_iter<I: IntoIterator<Item = DayRecord>>(iter: I) -> Self {
        Self { rows: iter.into_iter().collect() }
    }
}
