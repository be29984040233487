//! Sale record types.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stocktally_shared::types::UserId;

use super::error::SaleError;

/// Human-facing sale identifier, e.g. `2024-0115-0003`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(String);

impl SaleId {
    /// Wraps an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds the identifier of the `ordinal`-th sale recorded on `date`.
    ///
    /// `ordinal` is 1-based: the first sale of the day is `0001`.
    #[must_use]
    pub fn for_day(date: NaiveDate, ordinal: u32) -> Self {
        Self(format!("{}-{ordinal:04}", date.format("%Y-%m%d")))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SaleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One committed sale, as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleFact {
    /// Sale identifier.
    pub sale_id: SaleId,
    /// Name of the inventory item sold.
    pub item_name: String,
    /// Units sold, always positive.
    pub quantity: u32,
    /// Price of a single unit.
    pub unit_price: Decimal,
    /// When the sale was recorded (store-local time).
    pub sale_timestamp: NaiveDateTime,
    /// User the sale belongs to.
    pub owner: UserId,
}

impl SaleFact {
    /// Returns `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Calendar day the sale falls on.
    #[must_use]
    pub fn sale_date(&self) -> NaiveDate {
        self.sale_timestamp.date()
    }

    /// Checks the quantity and price constraints.
    pub fn validate(&self) -> Result<(), SaleError> {
        if self.quantity == 0 {
            return Err(SaleError::NonPositiveQuantity {
                sale_id: self.sale_id.to_string(),
            });
        }
        if self.unit_price < Decimal::ZERO {
            return Err(SaleError::NegativePrice {
                sale_id: self.sale_id.to_string(),
            });
        }
        Ok(())
    }
}
