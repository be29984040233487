//! Groups sale records into time buckets and totals them.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use stocktally_shared::types::UserId;

use super::period::{ReportPeriod, month_weeks, week_days, week_start};
use crate::sales::SaleFact;

/// Sales of a single day with their subtotal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket {
    /// The day.
    pub date: NaiveDate,
    /// Matching sales in retrieval order.
    pub sales: Vec<SaleFact>,
    /// Sum of `line_total` over `sales`.
    pub subtotal: Decimal,
}

impl DayBucket {
    fn new(date: NaiveDate, sales: Vec<SaleFact>) -> Self {
        let subtotal = sales.iter().map(SaleFact::line_total).sum();
        Self {
            date,
            sales,
            subtotal,
        }
    }

    /// Day header label, e.g. `Monday, 2024-01-15`.
    #[must_use]
    pub fn label(&self) -> String {
        self.date.format("%A, %Y-%m-%d").to_string()
    }
}

/// Non-empty days of one Monday-to-Sunday week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekBucket {
    /// Monday that starts the week.
    pub start: NaiveDate,
    /// Days with at least one sale, chronological.
    pub days: Vec<DayBucket>,
    /// Sum of the day subtotals.
    pub subtotal: Decimal,
}

impl WeekBucket {
    fn new(start: NaiveDate, days: Vec<DayBucket>) -> Self {
        let subtotal = days.iter().map(|d| d.subtotal).sum();
        Self {
            start,
            days,
            subtotal,
        }
    }

    /// ISO week number of the week.
    #[must_use]
    pub fn iso_week(&self) -> u32 {
        self.start.iso_week().week()
    }

    /// Number of sales across all days.
    #[must_use]
    pub fn sale_count(&self) -> usize {
        self.days.iter().map(|d| d.sales.len()).sum()
    }
}

/// Bucketed sales for one period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Aggregation {
    /// The reference day, possibly without sales.
    Day(DayBucket),
    /// The reference week; empty days omitted.
    Week(WeekBucket),
    /// Calendar weeks of the reference month; empty weeks omitted.
    Month(Vec<WeekBucket>),
}

impl Aggregation {
    /// The period the buckets were built for.
    #[must_use]
    pub const fn period(&self) -> ReportPeriod {
        match self {
            Self::Day(_) => ReportPeriod::Day,
            Self::Week(_) => ReportPeriod::Week,
            Self::Month(_) => ReportPeriod::Month,
        }
    }

    /// Sum of every included bucket subtotal.
    #[must_use]
    pub fn grand_total(&self) -> Decimal {
        match self {
            Self::Day(day) => day.subtotal,
            Self::Week(week) => week.subtotal,
            Self::Month(weeks) => weeks.iter().map(|w| w.subtotal).sum(),
        }
    }

    /// Number of sales across all buckets.
    #[must_use]
    pub fn sale_count(&self) -> usize {
        match self {
            Self::Day(day) => day.sales.len(),
            Self::Week(week) => week.sale_count(),
            Self::Month(weeks) => weeks.iter().map(WeekBucket::sale_count).sum(),
        }
    }
}

/// Buckets sale records by day, week and month.
pub struct Aggregator;

impl Aggregator {
    /// Buckets `owner`'s records for `period` around `reference_date`.
    ///
    /// Records of other owners, or outside the period, are ignored. Within a
    /// day the records keep their input order.
    #[must_use]
    pub fn aggregate(
        period: ReportPeriod,
        owner: UserId,
        records: &[SaleFact],
        reference_date: NaiveDate,
    ) -> Aggregation {
        let mut by_day = Self::group_by_day(owner, records);

        match period {
            ReportPeriod::Day => {
                let sales = by_day.remove(&reference_date).unwrap_or_default();
                Aggregation::Day(DayBucket::new(reference_date, sales))
            }
            ReportPeriod::Week => {
                let days = week_days(reference_date)
                    .filter_map(|date| Self::take_day(&mut by_day, date))
                    .collect();
                Aggregation::Week(WeekBucket::new(week_start(reference_date), days))
            }
            ReportPeriod::Month => {
                let weeks = month_weeks(reference_date)
                    .into_iter()
                    .map(|week| {
                        let days = week
                            .days
                            .iter()
                            .filter_map(|date| Self::take_day(&mut by_day, *date))
                            .collect();
                        WeekBucket::new(week.start, days)
                    })
                    .filter(|week| !week.days.is_empty())
                    .collect();
                Aggregation::Month(weeks)
            }
        }
    }

    fn group_by_day(owner: UserId, records: &[SaleFact]) -> BTreeMap<NaiveDate, Vec<SaleFact>> {
        let mut by_day: BTreeMap<NaiveDate, Vec<SaleFact>> = BTreeMap::new();
        for record in records.iter().filter(|r| r.owner == owner) {
            by_day
                .entry(record.sale_date())
                .or_default()
                .push(record.clone());
        }
        by_day
    }

    fn take_day(
        by_day: &mut BTreeMap<NaiveDate, Vec<SaleFact>>,
        date: NaiveDate,
    ) -> Option<DayBucket> {
        by_day
            .remove(&date)
            .filter(|sales| !sales.is_empty())
            .map(|sales| DayBucket::new(date, sales))
    }
}
