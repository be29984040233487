//! Stocktally report exporter
//!
//! Reads a JSON feed of committed sales and writes a day, week or month
//! sales report as an Excel workbook or a PDF.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use stocktally_core::reports::{ExportRequest, ReportService};
use stocktally_core::sales::{InMemorySaleSource, SalesSummary, recent_sales};
use stocktally_shared::AppConfig;
use stocktally_shared::config::LogConfig;
use stocktally_shared::types::UserId;

#[derive(Debug, Parser)]
#[command(name = "stocktally-export")]
#[command(about = "Export sales reports from a sales feed")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write a sales report for one period
    Export(ExportArgs),
    /// Print today / week / month totals and the latest sales as JSON
    Summary(SummaryArgs),
}

#[derive(Debug, Args)]
struct ExportArgs {
    /// JSON array of sales
    #[arg(long, short = 's')]
    sales: PathBuf,

    /// User whose sales are reported
    #[arg(long)]
    owner: UserId,

    /// Report period: day, week or month
    #[arg(long, short = 'p')]
    period: String,

    /// Output format: excel or pdf (defaults to report.default_format)
    #[arg(long, short = 'f')]
    format: Option<String>,

    /// Reference date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Directory the report is written to
    #[arg(long, short = 'o', default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Debug, Args)]
struct SummaryArgs {
    /// JSON array of sales
    #[arg(long, short = 's')]
    sales: PathBuf,

    /// User whose sales are summarized
    #[arg(long)]
    owner: UserId,

    /// Day to summarize up to, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Number of latest sales to list
    #[arg(long, default_value_t = 5)]
    recent: usize,
}

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.log);

    run(cli, &config)
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| log.filter.as_str().into());

    tracing_subscriber::registry()
        .with(filter)
        .with(log.json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!log.json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    match cli.command {
        Command::Export(args) => {
            let path = export(&args, config)?;
            println!("{}", path.display());
        }
        Command::Summary(args) => {
            let output = summary(&args)?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn load_sales(path: &Path) -> anyhow::Result<InMemorySaleSource> {
    let file =
        File::open(path).with_context(|| format!("Failed to open sales feed {}", path.display()))?;
    InMemorySaleSource::from_json_reader(BufReader::new(file))
        .with_context(|| format!("Failed to read sales feed {}", path.display()))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn export(args: &ExportArgs, config: &AppConfig) -> anyhow::Result<PathBuf> {
    let format = args
        .format
        .as_deref()
        .unwrap_or(config.report.default_format.as_str());
    let request = ExportRequest::parse(
        args.owner,
        &args.period,
        Some(format),
        args.date.unwrap_or_else(today),
    )?;

    let source = load_sales(&args.sales)?;
    let report = ReportService::new(config).export(&source, &request)?;

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;
    let path = args.out_dir.join(&report.filename);
    fs::write(&path, &report.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(
        path = %path.display(),
        content_type = report.content_type,
        "Report written"
    );
    Ok(path)
}

fn summary(args: &SummaryArgs) -> anyhow::Result<serde_json::Value> {
    let source = load_sales(&args.sales)?;
    let as_of = args.date.unwrap_or_else(today);

    let totals = SalesSummary::compute(source.sales(), args.owner, as_of);
    let recent = recent_sales(source.sales(), args.owner, args.recent);

    Ok(json!({
        "totals": totals,
        "recent": recent,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn feed(dir: &Path, owner: UserId) -> PathBuf {
        let path = dir.join("sales.json");
        let mut file = File::create(&path).unwrap();
        write!(
            file,
            r#"[
                {{"sale_id": "2024-0115-0001", "item_name": "Candle", "quantity": 3,
                  "unit_price": "10.00", "sale_timestamp": "2024-01-15T10:30:00", "owner": "{owner}"}},
                {{"sale_id": "2024-0117-0001", "item_name": "Soap", "quantity": 1,
                  "unit_price": "20.00", "sale_timestamp": "2024-01-17T16:05:00", "owner": "{owner}"}}
            ]"#
        )
        .unwrap();
        path
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("stocktally-export").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_export_writes_suggested_filename() {
        let dir = tempfile::tempdir().unwrap();
        let owner = UserId::new();
        let sales = feed(dir.path(), owner);
        let owner = owner.to_string();
        let cli = parse(&[
            "export",
            "--sales",
            sales.to_str().unwrap(),
            "--owner",
            &owner,
            "--period",
            "week",
            "--date",
            "2024-01-17",
            "--out-dir",
            dir.path().to_str().unwrap(),
        ]);
        let Command::Export(args) = cli.command else {
            panic!("expected export command");
        };

        let path = export(&args, &AppConfig::default()).unwrap();

        assert_eq!(path.file_name().unwrap(), "sales_week_2024-01-17.xlsx");
        assert!(fs::read(&path).unwrap().starts_with(b"PK"));
    }

    #[test]
    fn test_export_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let owner = UserId::new();
        let sales = feed(dir.path(), owner);
        let owner = owner.to_string();
        let cli = parse(&[
            "export", "-s", sales.to_str().unwrap(), "--owner", &owner, "-p", "month",
            "-f", "pdf", "--date", "2024-01-02", "-o", dir.path().to_str().unwrap(),
        ]);
        let Command::Export(args) = cli.command else {
            panic!("expected export command");
        };

        let path = export(&args, &AppConfig::default()).unwrap();

        assert_eq!(path.file_name().unwrap(), "sales_month_2024-01-02.pdf");
        assert!(fs::read(&path).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn test_export_rejects_unknown_period() {
        let dir = tempfile::tempdir().unwrap();
        let owner = UserId::new();
        let sales = feed(dir.path(), owner);
        let owner = owner.to_string();
        let cli = parse(&[
            "export", "-s", sales.to_str().unwrap(), "--owner", &owner, "-p", "year",
            "-o", dir.path().to_str().unwrap(),
        ]);
        let Command::Export(args) = cli.command else {
            panic!("expected export command");
        };

        let err = export(&args, &AppConfig::default()).unwrap_err();

        assert!(err.to_string().contains("Invalid report period: year"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_summary_totals() {
        let dir = tempfile::tempdir().unwrap();
        let owner = UserId::new();
        let sales = feed(dir.path(), owner);
        let owner = owner.to_string();
        let cli = parse(&[
            "summary", "-s", sales.to_str().unwrap(), "--owner", &owner, "--date", "2024-01-17",
            "--recent", "1",
        ]);
        let Command::Summary(args) = cli.command else {
            panic!("expected summary command");
        };

        let output = summary(&args).unwrap();

        assert_eq!(output["totals"]["today"], "20.00");
        assert_eq!(output["totals"]["week_to_date"], "50.00");
        assert_eq!(output["recent"].as_array().unwrap().len(), 1);
        assert_eq!(output["recent"][0]["sale_id"], "2024-0117-0001");
    }

    #[test]
    fn test_missing_feed_is_reported() {
        let args = SummaryArgs {
            sales: PathBuf::from("/nonexistent/sales.json"),
            owner: UserId::new(),
            date: None,
            recent: 5,
        };
        let err = summary(&args).unwrap_err();
        assert!(err.to_string().contains("Failed to open sales feed"));
    }
}
