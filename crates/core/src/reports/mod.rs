//! Sales report generation.
//!
//! Exports run in four steps:
//! - `period` resolves the day, week or month a report covers
//! - `aggregate` buckets the owner's sales by day and calendar week
//! - `builder` lays the buckets out as titled sheets of typed cells
//! - `export` encodes the sheets as an Excel workbook or a paginated PDF
//!
//! `service` ties the steps to a `SaleSource`.

pub mod aggregate;
pub mod builder;
pub mod error;
pub mod export;
pub mod period;
pub mod service;
pub mod types;


pub use aggregate::{Aggregation, Aggregator, DayBucket, WeekBucket};
pub use builder::ReportBuilder;
pub use error::ReportError;
pub use export::{ExportFormat, Exporter};
pub use period::ReportPeriod;
pub use service::{ExportRequest, ExportedReport, ReportService};
pub use types::*;
