//! Report error types.

use stocktally_shared::AppError;
use thiserror::Error;

use crate::sales::SaleError;

/// Errors that can occur during report generation and export.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Period is not one of `day`, `week`, `month`.
    #[error("Invalid report period: {0}")]
    InvalidPeriod(String),

    /// Format is not one of `excel`, `pdf`.
    #[error("Invalid export format: {0}")]
    InvalidFormat(String),

    /// Sheet title cannot be turned into a usable worksheet name.
    #[error("Invalid sheet name: {0:?}")]
    InvalidSheetName(String),

    /// Sale records could not be read.
    #[error("Sale source error: {0}")]
    Source(#[from] SaleError),

    /// Underlying encoder failed.
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl ReportError {
    /// Create a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ReportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::InvalidPeriod(_)
            | ReportError::InvalidFormat(_)
            | ReportError::Source(SaleError::InvalidDateRange { .. }) => {
                Self::Validation(err.to_string())
            }
            ReportError::Source(_) => Self::ExternalService(err.to_string()),
            ReportError::InvalidSheetName(_) | ReportError::Serialization(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_request_errors_map_to_validation() {
        let app: AppError = ReportError::InvalidPeriod("year".into()).into();
        assert_eq!(app.status_code(), 400);

        let app: AppError = ReportError::InvalidFormat("csv".into()).into();
        assert_eq!(app.error_code(), "VALIDATION_ERROR");

        let app: AppError = ReportError::Source(SaleError::InvalidDateRange {
            start: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        })
        .into();
        assert_eq!(app.status_code(), 400);
    }

    #[test]
    fn test_store_and_encoder_errors() {
        let app: AppError = ReportError::Source(SaleError::unavailable("down")).into();
        assert_eq!(app.error_code(), "EXTERNAL_SERVICE_ERROR");

        let app: AppError = ReportError::serialization("boom").into();
        assert_eq!(app.status_code(), 500);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ReportError::InvalidPeriod("year".into()).to_string(),
            "Invalid report period: year"
        );
        assert_eq!(
            ReportError::InvalidFormat("csv".into()).to_string(),
            "Invalid export format: csv"
        );
    }
}
