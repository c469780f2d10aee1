use catalog_check_core::config::ReportFormat;
use catalog_check_core::logging::LogLevel;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Fetches the product catalog and checks titles, prices and ratings.
#[derive(Parser, Debug)]
#[command(name = "catalog-check", version)]
pub struct Cli {
    /// TOML config file (default: ./catalog-check.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Catalog endpoint, overrides the configured source
    #[arg(long, conflicts_with = "file")]
    pub url: Option<String>,
    /// Validate a saved JSON response instead of fetching
    #[arg(long)]
    pub file: Option<String>,
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
    /// Skip the defect report
    #[arg(long)]
    pub no_report: bool,
    #[arg(long, value_enum)]
    pub log_level: Option<LevelArg>,
    /// Append structured events to this JSONL file
    #[arg(long)]
    pub events_file: Option<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum LevelArg {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LevelArg> for LogLevel {
    fn from(value: LevelArg) -> Self {
        match value {
            LevelArg::Trace => LogLevel::Trace,
            LevelArg::Debug => LogLevel::Debug,
            LevelArg::Info => LogLevel::Info,
            LevelArg::Warn => LogLevel::Warn,
            LevelArg::Error => LogLevel::Error,
        }
    }
}
