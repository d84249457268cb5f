// In crates/core-types/src/error.rs

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Bar {index} at {timestamp} is older than the bar before it")]
    OutOfOrder {
        index: usize,
        timestamp: DateTime<Utc>,
    },

    #[error("Bar {index} repeats timestamp {timestamp}")]
    DuplicateTimestamp {
        index: usize,
        timestamp: DateTime<Utc>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
