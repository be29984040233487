//! Export orchestration: read sales, bucket, lay out, encode.

use chrono::NaiveDate;
use stocktally_shared::AppConfig;
use stocktally_shared::types::UserId;
use tracing::{debug, info};

use super::aggregate::Aggregator;
use super::builder::ReportBuilder;
use super::error::ReportError;
use super::export::{ExportFormat, Exporter};
use super::period::ReportPeriod;
use super::types::ReportDocument;
use crate::sales::SaleSource;

/// Validated parameters of one export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportRequest {
    /// User whose sales are reported.
    pub owner: UserId,
    /// Report granularity.
    pub period: ReportPeriod,
    /// Output encoding.
    pub format: ExportFormat,
    /// Day the period is anchored on.
    pub reference_date: NaiveDate,
}

impl ExportRequest {
    /// Parses raw request parameters.
    ///
    /// The period is checked first; a missing format means `excel`.
    pub fn parse(
        owner: UserId,
        period: &str,
        format: Option<&str>,
        reference_date: NaiveDate,
    ) -> Result<Self, ReportError> {
        let period: ReportPeriod = period.parse()?;
        let format: ExportFormat = match format {
            Some(format) => format.parse()?,
            None => ExportFormat::default(),
        };
        Ok(Self {
            owner,
            period,
            format,
            reference_date,
        })
    }

    /// Suggested download name, e.g. `sales_week_2024-01-17.xlsx`.
    #[must_use]
    pub fn filename(&self) -> String {
        format!(
            "sales_{}_{}.{}",
            self.period,
            self.reference_date.format("%Y-%m-%d"),
            self.format.extension()
        )
    }
}

/// Encoded export plus the attributes a transport needs to deliver it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedReport {
    /// Encoded document.
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`.
    pub content_type: &'static str,
    /// Suggested filename.
    pub filename: String,
}

/// Service for generating sales report exports.
#[derive(Debug, Clone, Default)]
pub struct ReportService {
    builder: ReportBuilder,
    exporter: Exporter,
}

impl ReportService {
    /// Creates a service from application configuration.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self {
            builder: ReportBuilder::new().with_formula_totals(config.report.formula_totals),
            exporter: Exporter::new(config.pdf.clone()),
        }
    }

    /// Reads the period's sales from `source` and lays them out.
    pub fn build_document<S: SaleSource + ?Sized>(
        &self,
        source: &S,
        request: &ExportRequest,
    ) -> Result<ReportDocument, ReportError> {
        let (start, end) = request.period.date_range(request.reference_date);
        let records = source.find_sales_between(request.owner, start, end)?;
        for record in &records {
            record.validate()?;
        }

        let aggregation =
            Aggregator::aggregate(request.period, request.owner, &records, request.reference_date);
        debug!(
            period = %request.period,
            %start,
            %end,
            records = records.len(),
            included = aggregation.sale_count(),
            "Aggregated sales"
        );

        Ok(self.builder.build(&aggregation, request.reference_date))
    }

    /// Produces the encoded export for `request`.
    pub fn export<S: SaleSource + ?Sized>(
        &self,
        source: &S,
        request: &ExportRequest,
    ) -> Result<ExportedReport, ReportError> {
        let document = self.build_document(source, request)?;
        let bytes = self.exporter.export(&document, request.format)?;

        let report = ExportedReport {
            bytes,
            content_type: request.format.content_type(),
            filename: request.filename(),
        };
        info!(
            owner = %request.owner,
            period = %request.period,
            format = %request.format,
            sheets = document.sheets.len(),
            bytes = report.bytes.len(),
            filename = %report.filename,
            "Sales report exported"
        );
        Ok(report)
    }
}
