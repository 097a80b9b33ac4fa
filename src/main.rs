//! imgcheck - Structural validator for TIFF and JPEG files.
//!
//! This binary parses the command line, collects files and prints one
//! result line per file to stdout. Logging goes to stderr.

use std::io::Write;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imgcheck::{
    config::Config,
    format::FileReport,
    worker::{self, collect_files, thread_count},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    init_logging(&config);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let settings = config.settings();
    let files = collect_files(&config.paths, &settings, config.known_extensions_only);
    if files.is_empty() {
        info!("No files to check");
        return ExitCode::SUCCESS;
    }

    let num_files = files.len();
    let threads = thread_count(config.threads, num_files);
    debug!(files = num_files, threads, "starting workers");

    let started = Instant::now();
    let mut reports = worker::run(files, &settings, threads);
    let mut stdout = std::io::stdout().lock();
    while let Some(report) = reports.recv().await {
        if config.quiet && report.is_ok() {
            continue;
        }
        if let Err(e) = print_report(&mut stdout, &report, config.json) {
            error!("Cannot write result: {}", e);
            return ExitCode::FAILURE;
        }
    }

    info!(
        "Checked {} file(s) in {:.1} s",
        num_files,
        started.elapsed().as_secs_f64()
    );
    ExitCode::SUCCESS
}

/// Write one result line, TSV or JSON.
fn print_report(out: &mut impl Write, report: &FileReport, json: bool) -> std::io::Result<()> {
    if json {
        serde_json::to_writer(&mut *out, report)?;
        writeln!(out)
    } else {
        writeln!(out, "{}", report.to_line())
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(config: &Config) {
    let filter = config.log_filter();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
