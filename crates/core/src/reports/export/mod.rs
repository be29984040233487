//! Serializes report documents into downloadable byte streams.

pub mod pdf;
pub mod xlsx;

use serde::{Deserialize, Serialize};
use stocktally_shared::config::PdfConfig;
use tracing::debug;

use super::error::ReportError;
use super::types::ReportDocument;

/// Output encoding of an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportFormat {
    /// Excel workbook, one worksheet per sheet.
    #[default]
    #[serde(rename = "excel")]
    Spreadsheet,
    /// Paginated PDF document.
    #[serde(rename = "pdf")]
    PaginatedText,
}

impl ExportFormat {
    /// Returns the request parameter spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spreadsheet => "excel",
            Self::PaginatedText => "pdf",
        }
    }

    /// MIME type of the encoded bytes.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            Self::PaginatedText => "application/pdf",
        }
    }

    /// File extension, without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Spreadsheet => "xlsx",
            Self::PaginatedText => "pdf",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "excel" => Ok(Self::Spreadsheet),
            "pdf" => Ok(Self::PaginatedText),
            _ => Err(ReportError::InvalidFormat(s.to_string())),
        }
    }
}

/// Renders documents in either output encoding.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    pdf: PdfConfig,
}

impl Exporter {
    /// Creates an exporter with the given page layout for PDF output.
    #[must_use]
    pub fn new(pdf: PdfConfig) -> Self {
        Self { pdf }
    }

    /// Encodes `document` as `format`.
    ///
    /// Partially written output is dropped on failure.
    pub fn export(
        &self,
        document: &ReportDocument,
        format: ExportFormat,
    ) -> Result<Vec<u8>, ReportError> {
        debug!(
            format = %format,
            sheets = document.sheets.len(),
            "Encoding report document"
        );

        match format {
            ExportFormat::Spreadsheet => xlsx::render(document),
            ExportFormat::PaginatedText => pdf::render(document, &self.pdf),
        }
    }
}
