// In crates/core-types/src/types.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// A ticker symbol, e.g. "AAPL" or "BTC-USD".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A single OHLC bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kline {
    pub open_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

impl Kline {
    /// The calendar date the bar belongs to.
    pub fn date(&self) -> NaiveDate {
        self.open_time.date_naive()
    }
}

/// One (timestamp, close) observation of a `PriceSeries`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub close: Decimal,
}

/// A close-price series with strictly increasing timestamps.
///
/// The only way to build one is `PriceSeries::from_klines`, so holding a
/// `PriceSeries` means the ordering has already been checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Validates the bars and extracts their close prices.
    ///
    /// Fails on the first bar whose timestamp is not strictly after its
    /// predecessor's.
    pub fn from_klines(klines: &[Kline]) -> Result<Self> {
        let mut points: Vec<PricePoint> = Vec::with_capacity(klines.len());

        for (index, kline) in klines.iter().enumerate() {
            if let Some(prev) = points.last().map(|p| p.timestamp) {
                if kline.open_time == prev {
                    return Err(Error::DuplicateTimestamp {
                        index,
                        timestamp: kline.open_time,
                    });
                }
                if kline.open_time < prev {
                    return Err(Error::OutOfOrder {
                        index,
                        timestamp: kline.open_time,
                    });
                }
            }

            points.push(PricePoint {
                timestamp: kline.open_time,
                close: kline.close,
            });
        }

        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<Decimal> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Date of the most recent observation, if any.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.timestamp.date_naive())
    }
}
