mod cli;

use anyhow::bail;
use catalog_check_core::config::{CheckConfig, ReportFormat};
use catalog_check_core::logging::{
    BufferedEventLogger, FanoutEventLogger, SharedEventLogger, StderrEventLogger,
};
use catalog_check_core::metrics::{InMemoryMetrics, Metrics};
use catalog_check_core::orchestrator::{CatalogValidator, RunError, RunSummary};
use catalog_check_core::source::{FetchError, SourceConfig};
use catalog_check_core::sources::create_source;
use clap::Parser;
use cli::Cli;
use std::ffi::OsString;
use std::process::ExitCode;
use std::sync::Arc;

const EXIT_OK: u8 = 0;
const EXIT_VALIDATION: u8 = 1;
const EXIT_TRANSPORT: u8 = 2;
const EXIT_USAGE: u8 = 3;

#[derive(serde::Serialize)]
struct JsonOut<T: serde::Serialize> {
    ok: bool,
    data: T,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    ExitCode::from(run_args(std::env::args_os()).await)
}

/// Parses `args` and runs one check, returning the process exit code.
/// Argument errors map to the usage code rather than clap's default of 2,
/// which is reserved for transport failures.
async fn run_args<I, T>(args: I) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { EXIT_USAGE } else { EXIT_OK };
        }
    };
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            EXIT_USAGE
        }
    }
}

fn apply_overrides(mut cfg: CheckConfig, cli: &Cli) -> anyhow::Result<CheckConfig> {
    let configured_timeout = match &cfg.source {
        SourceConfig::Http { timeout_ms, .. } => *timeout_ms,
        SourceConfig::File { .. } => None,
    };
    if let Some(path) = &cli.file {
        cfg.source = SourceConfig::File { path: path.clone() };
    } else if let Some(url) = &cli.url {
        cfg.source = SourceConfig::Http {
            url: url.clone(),
            timeout_ms: configured_timeout,
        };
    }
    if let Some(ms) = cli.timeout_ms {
        match &mut cfg.source {
            SourceConfig::Http { timeout_ms, .. } => *timeout_ms = Some(ms),
            SourceConfig::File { .. } => bail!("--timeout-ms only applies to HTTP sources"),
        }
    }
    if let Some(format) = cli.format {
        cfg.report.format = format.into();
    }
    if cli.no_report {
        cfg.report.enabled = false;
    }
    if let Some(level) = cli.log_level {
        cfg.logging.level = level.into();
    }
    if let Some(path) = &cli.events_file {
        cfg.logging.events_file = Some(path.clone());
    }
    Ok(cfg)
}

fn build_logger(cfg: &CheckConfig) -> SharedEventLogger {
    let stderr: SharedEventLogger = Arc::new(StderrEventLogger::new(cfg.logging.level));
    let Some(path) = &cfg.logging.events_file else {
        return stderr;
    };
    let file: SharedEventLogger = Arc::new(BufferedEventLogger::new(1024).with_events_file(path));
    Arc::new(FanoutEventLogger::new(vec![stderr, file]))
}

fn print_text(summary: &RunSummary, report_enabled: bool) {
    for outcome in &summary.validation.outcomes {
        match &outcome.message {
            None => eprintln!("PASS {} ({} records)", outcome.rule, outcome.inspected),
            Some(message) => eprintln!("FAIL {}: {}", outcome.rule, message),
        }
    }
    if report_enabled {
        eprint!("{}", summary.validation.report.render_text());
    }
    let failed = summary.validation.failures().count();
    eprintln!(
        "{}: {} records from {} (status {}), {} of {} rules failed",
        if summary.passed() { "ok" } else { "FAILED" },
        summary.records,
        summary.location,
        summary.status,
        failed,
        summary.validation.outcomes.len()
    );
}

fn print_fetch_failure(
    json: bool,
    run_id: Option<&str>,
    location: &str,
    e: &FetchError,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut {
                ok: false,
                data: serde_json::json!({
                    "run_id": run_id,
                    "location": location,
                    "status": e.status(),
                    "error": e.to_string(),
                }),
            })?
        );
    } else {
        eprintln!("FAIL fetch {location}: {e}");
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<u8> {
    let cfg = CheckConfig::load(cli.config.as_deref())?;
    let cfg = apply_overrides(cfg, &cli)?;
    let json = cfg.report.format == ReportFormat::Json;
    let location = cfg.source.location();

    let logger = build_logger(&cfg);
    let metrics = Arc::new(InMemoryMetrics::new());
    let source = match create_source(cfg.source.clone(), logger.clone()) {
        Ok(source) => source,
        Err(e) => {
            print_fetch_failure(json, None, location, &e)?;
            return Ok(EXIT_TRANSPORT);
        }
    };
    let validator = CatalogValidator::new(source, logger, metrics.clone());

    let summary = match validator.run().await {
        Ok(summary) => summary,
        Err(RunError::Fetch(e)) => {
            print_fetch_failure(json, Some(validator.run_id()), location, &e)?;
            return Ok(EXIT_TRANSPORT);
        }
    };

    if json {
        let mut run = serde_json::to_value(&summary)?;
        if !cfg.report.enabled {
            if let Some(validation) = run.get_mut("validation").and_then(|v| v.as_object_mut()) {
                validation.remove("report");
            }
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut {
                ok: summary.passed(),
                data: serde_json::json!({
                    "run": run,
                    "metrics": metrics.snapshot(),
                }),
            })?
        );
    } else {
        print_text(&summary, cfg.report.enabled);
    }

    Ok(if summary.passed() {
        EXIT_OK
    } else {
        EXIT_VALIDATION
    })
}
