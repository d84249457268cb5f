// In app/src/loader.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use core_types::Kline;
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed price data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row}: unrecognised date '{value}'")]
    BadDate { row: usize, value: String },
}

impl LoadError {
    /// True when the file was readable but its contents are not a price table.
    pub fn is_format_error(&self) -> bool {
        match self {
            LoadError::Io { .. } => false,
            LoadError::Csv(err) => !matches!(err.kind(), csv::ErrorKind::Io(_)),
            LoadError::BadDate { .. } => true,
        }
    }
}

/// One row of a price export, e.g. `Date,Open,High,Low,Close,Volume`.
/// Extra columns such as `Adj Close` are ignored.
#[derive(Debug, Deserialize)]
struct PriceRow {
    #[serde(rename = "Date", alias = "date", alias = "Datetime", alias = "timestamp")]
    date: String,
    #[serde(rename = "Open", alias = "open")]
    open: Decimal,
    #[serde(rename = "High", alias = "high")]
    high: Decimal,
    #[serde(rename = "Low", alias = "low")]
    low: Decimal,
    #[serde(rename = "Close", alias = "close")]
    close: Decimal,
    #[serde(rename = "Volume", alias = "volume", default)]
    volume: Option<Decimal>,
}

/// Loads bars from a CSV file, in file order.
pub fn load_klines(path: &Path) -> Result<Vec<Kline>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_klines(file)
}

pub fn read_klines<R: Read>(reader: R) -> Result<Vec<Kline>, LoadError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut klines = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let row: PriceRow = result?;
        let open_time = parse_timestamp(&row.date).ok_or_else(|| LoadError::BadDate {
            row: index + 1,
            value: row.date.clone(),
        })?;

        klines.push(Kline {
            open_time,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume.unwrap_or_default(),
        });
    }

    Ok(klines)
}

/// Parses the date formats found in common price exports.
///
/// Timestamps carrying an offset keep their local wall-clock time so the bar
/// stays on the exchange's calendar date.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local().and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.naive_local().and_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    ["%Y-%m-%d", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Keeps the bars whose calendar date lies within `[start, end]`.
pub fn filter_range(klines: Vec<Kline>, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Vec<Kline> {
    klines
        .into_iter()
        .filter(|k| start.is_none_or(|s| k.date() >= s))
        .filter(|k| end.is_none_or(|e| k.date() <= e))
        .collect()
}
