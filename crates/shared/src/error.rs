//! Application-wide error types.

use thiserror::Error;

/// Application error types.
///
/// Domain crates convert their own errors into this taxonomy so a transport
/// layer can map every failure onto a status and a stable code.
#[derive(Debug, Error)]
pub enum AppError {
    /// Validation error (bad request parameters).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// External collaborator (sale store) failed.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::ExternalService(_) => 502,
            Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
