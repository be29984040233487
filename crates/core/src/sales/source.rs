//! Read-only access to committed sales.

use std::io::Read;

use chrono::NaiveDate;
use stocktally_shared::types::UserId;

use super::error::SaleError;
use super::types::SaleFact;

/// Store that hands out the sales already committed for a user.
///
/// Implementations return records in their natural retrieval order;
/// callers do not re-sort within a day.
pub trait SaleSource {
    /// Returns the sales `owner` recorded on `date`.
    fn find_sales(&self, owner: UserId, date: NaiveDate) -> Result<Vec<SaleFact>, SaleError>;

    /// Returns the sales `owner` recorded between `start` and `end`, inclusive.
    ///
    /// The default implementation issues one `find_sales` call per day.
    fn find_sales_between(
        &self,
        owner: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SaleFact>, SaleError> {
        check_range(start, end)?;

        let mut sales = Vec::new();
        for date in start.iter_days().take_while(|d| *d <= end) {
            sales.extend(self.find_sales(owner, date)?);
        }
        Ok(sales)
    }
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), SaleError> {
    if start > end {
        return Err(SaleError::InvalidDateRange { start, end });
    }
    Ok(())
}

/// Sale store held entirely in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemorySaleSource {
    sales: Vec<SaleFact>,
}

impl InMemorySaleSource {
    /// Creates a store from already-committed sales.
    ///
    /// # Errors
    ///
    /// Returns an error if any sale violates the quantity or price constraints.
    pub fn new(sales: Vec<SaleFact>) -> Result<Self, SaleError> {
        for sale in &sales {
            sale.validate()?;
        }
        Ok(Self { sales })
    }

    /// Reads a JSON array of sales.
    pub fn from_json_reader(reader: impl Read) -> Result<Self, SaleError> {
        let sales: Vec<SaleFact> = serde_json::from_reader(reader)?;
        Self::new(sales)
    }

    /// All stored sales, every owner included.
    #[must_use]
    pub fn sales(&self) -> &[SaleFact] {
        &self.sales
    }
}

impl SaleSource for InMemorySaleSource {
    fn find_sales(&self, owner: UserId, date: NaiveDate) -> Result<Vec<SaleFact>, SaleError> {
        Ok(self
            .sales
            .iter()
            .filter(|s| s.owner == owner && s.sale_date() == date)
            .cloned()
            .collect())
    }

    fn find_sales_between(
        &self,
        owner: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SaleFact>, SaleError> {
        check_range(start, end)?;

        Ok(self
            .sales
            .iter()
            .filter(|s| s.owner == owner && (start..=end).contains(&s.sale_date()))
            .cloned()
            .collect())
    }
}
