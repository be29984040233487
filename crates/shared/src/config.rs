//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
///
/// Every section falls back to its defaults, so an empty configuration is valid.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Report generation configuration.
    #[serde(default)]
    pub report: ReportConfig,
    /// Paginated document layout.
    #[serde(default)]
    pub pdf: PdfConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Report generation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Output format used when a request names none (`excel` or `pdf`).
    #[serde(default = "default_format")]
    pub default_format: String,
    /// Write spreadsheet subtotals as `SUM` formulas instead of plain values.
    #[serde(default)]
    pub formula_totals: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            formula_totals: false,
        }
    }
}

fn default_format() -> String {
    "excel".to_string()
}

/// Page geometry and typography for the paginated document.
///
/// Lengths are millimetres, font sizes are points.
#[derive(Debug, Clone, Deserialize)]
pub struct PdfConfig {
    /// Page width.
    #[serde(default = "default_page_width")]
    pub page_width_mm: Decimal,
    /// Page height.
    #[serde(default = "default_page_height")]
    pub page_height_mm: Decimal,
    /// Margin on every side of the page.
    #[serde(default = "default_margin")]
    pub margin_mm: Decimal,
    /// Vertical space consumed by a sheet title.
    #[serde(default = "default_title_gap")]
    pub title_gap_mm: Decimal,
    /// Vertical space consumed by one row.
    #[serde(default = "default_line_height")]
    pub line_height_mm: Decimal,
    /// Title font size.
    #[serde(default = "default_title_font_size")]
    pub title_font_size_pt: Decimal,
    /// Row font size.
    #[serde(default = "default_body_font_size")]
    pub body_font_size_pt: Decimal,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            page_width_mm: default_page_width(),
            page_height_mm: default_page_height(),
            margin_mm: default_margin(),
            title_gap_mm: default_title_gap(),
            line_height_mm: default_line_height(),
            title_font_size_pt: default_title_font_size(),
            body_font_size_pt: default_body_font_size(),
        }
    }
}

fn default_page_width() -> Decimal {
    Decimal::new(210, 0) // A4
}

fn default_page_height() -> Decimal {
    Decimal::new(297, 0) // A4
}

fn default_margin() -> Decimal {
    Decimal::new(20, 0)
}

fn default_title_gap() -> Decimal {
    Decimal::new(15, 0)
}

fn default_line_height() -> Decimal {
    Decimal::new(7, 0)
}

fn default_title_font_size() -> Decimal {
    Decimal::new(14, 0)
}

fn default_body_font_size() -> Decimal {
    Decimal::new(10, 0)
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_log_filter() -> String {
    "stocktally=info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("STOCKTALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
