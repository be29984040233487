//! Sale source error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while reading sale records.
#[derive(Debug, Error)]
pub enum SaleError {
    /// A sale with a zero quantity reached the reader.
    #[error("sale {sale_id} has a non-positive quantity")]
    NonPositiveQuantity {
        /// Offending sale.
        sale_id: String,
    },

    /// A sale with a negative unit price reached the reader.
    #[error("sale {sale_id} has a negative unit price")]
    NegativePrice {
        /// Offending sale.
        sale_id: String,
    },

    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// The backing store could not be read.
    #[error("sale store unavailable: {0}")]
    Unavailable(String),
}

impl SaleError {
    /// Create a store unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

impl From<serde_json::Error> for SaleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Unavailable(format!("malformed sale feed: {err}"))
    }
}
