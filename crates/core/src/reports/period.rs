//! Report periods and the calendar arithmetic behind them.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::error::ReportError;

/// Report granularity selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    /// The reference day only.
    Day,
    /// Monday through Sunday of the reference day's ISO week.
    Week,
    /// Every calendar week touching the reference day's month.
    Month,
}

impl ReportPeriod {
    /// Returns the request parameter spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Inclusive date range whose sales the period reports on.
    #[must_use]
    pub fn date_range(self, reference: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Day => (reference, reference),
            Self::Week => {
                let start = week_start(reference);
                (start, start + Days::new(6))
            }
            Self::Month => {
                let first = month_start(reference);
                let last = month_days(reference).last().unwrap_or(first);
                (first, last)
            }
        }
    }
}

impl std::fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportPeriod {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(ReportError::InvalidPeriod(s.to_string())),
        }
    }
}

/// Monday of the ISO week containing `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}

/// The seven days of the ISO week containing `date`, Monday first.
pub fn week_days(date: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    week_start(date).iter_days().take(7)
}

/// First day of `date`'s month.
#[must_use]
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Every day of `date`'s month, in order.
pub fn month_days(date: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    month_start(date)
        .iter_days()
        .take_while(move |d| same_month(*d, date))
}

/// Whether two dates share year and month.
#[must_use]
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// A Monday-to-Sunday week, restricted to the days of one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarWeek {
    /// Monday that starts the week (may lie in the previous month).
    pub start: NaiveDate,
    /// Days of the week inside the month, in order. Never empty.
    pub days: Vec<NaiveDate>,
}

/// Calendar weeks covering `reference`'s month.
///
/// Starts at the Monday on or before the 1st and stops after the week holding
/// the last day of the month. Membership is decided per day, so a December
/// week running into January keeps only its December days.
#[must_use]
pub fn month_weeks(reference: NaiveDate) -> Vec<CalendarWeek> {
    let mut weeks = Vec::new();
    let mut start = week_start(month_start(reference));

    loop {
        let days: Vec<NaiveDate> = start
            .iter_days()
            .take(7)
            .filter(|d| same_month(*d, reference))
            .collect();
        if days.is_empty() {
            break;
        }
        weeks.push(CalendarWeek { start, days });
        start = start + Days::new(7);
    }

    weeks
}
