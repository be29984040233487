//! Running sales totals for the sales overview.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;
use stocktally_shared::types::UserId;

use super::types::SaleFact;

/// Today, week-to-date and month-to-date sales for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SalesSummary {
    /// Day the summary was computed for.
    pub as_of: NaiveDate,
    /// Sales recorded on `as_of`.
    pub today: Decimal,
    /// Sales from the Monday of `as_of`'s week through `as_of`.
    pub week_to_date: Decimal,
    /// Sales from the first of `as_of`'s month through `as_of`.
    pub month_to_date: Decimal,
}

impl SalesSummary {
    /// Sums `line_total` over `owner`'s sales into the three windows.
    #[must_use]
    pub fn compute(records: &[SaleFact], owner: UserId, as_of: NaiveDate) -> Self {
        let week_start = as_of.week(Weekday::Mon).first_day();
        let mut summary = Self {
            as_of,
            today: Decimal::ZERO,
            week_to_date: Decimal::ZERO,
            month_to_date: Decimal::ZERO,
        };

        for sale in records.iter().filter(|s| s.owner == owner) {
            let date = sale.sale_date();
            if date > as_of {
                continue;
            }
            let total = sale.line_total();
            if date == as_of {
                summary.today += total;
            }
            if date >= week_start {
                summary.week_to_date += total;
            }
            if date.year() == as_of.year() && date.month() == as_of.month() {
                summary.month_to_date += total;
            }
        }

        summary
    }
}

/// Returns `owner`'s newest sales first, at most `limit` of them.
#[must_use]
pub fn recent_sales(records: &[SaleFact], owner: UserId, limit: usize) -> Vec<&SaleFact> {
    let mut sales: Vec<&SaleFact> = records.iter().filter(|s| s.owner == owner).collect();
    sales.sort_by(|a, b| b.sale_timestamp.cmp(&a.sale_timestamp));
    sales.truncate(limit);
    sales
}
