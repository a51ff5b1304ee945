mod cli;
mod config;
mod console;
mod error;
mod fetcher;
mod markdown;
mod metrics;
mod model;

use crate::cli::Cli;
use crate::config::{CONFIG, Config, OutputMode};
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::markdown::MarkdownReporter;
use crate::metrics::Metrics;
use crate::model::HotSearchEntry;
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::io::{self, Write};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(name) => Config::load_from(name)?,
        None => CONFIG.clone(),
    };
    cli.apply(&mut config);

    info!(
        endpoint = %config.http.endpoint,
        timeout_secs = config.http.timeout_secs,
        limit = config.fetcher.limit,
        mode = ?config.report.mode,
        "Configuration loaded"
    );

    let client = fetcher::build_client(&config.http)?;
    let metrics = Metrics::new();
    let fetcher = Fetcher::new(
        client,
        config.http.clone(),
        config.fetcher.limit,
        metrics.clone(),
    );

    let entries = match fetcher.fetch_hot_search().await {
        Ok(entries) => entries,
        Err(e) => {
            error!(error = %e, "Failed to fetch hot search, no report produced");
            metrics.log_summary();
            return Err(e);
        }
    };

    let today = Local::now().date_naive();
    if let Err(e) = emit_report(&config, &entries, today, &metrics, &mut io::stdout().lock()) {
        error!(error = %e, "Failed to write report to stdout");
    }

    metrics.log_summary();
    info!("Run completed");
    Ok(())
}

/// Hands the entries to the selected reporter. An empty list leaves any
/// report already written for `date` untouched.
fn emit_report(
    config: &Config,
    entries: &[HotSearchEntry],
    date: NaiveDate,
    metrics: &Metrics,
    out: &mut impl Write,
) -> io::Result<()> {
    if entries.is_empty() {
        warn!("Hot search list is empty, nothing to report");
        return Ok(());
    }

    match config.report.mode {
        OutputMode::Markdown => {
            let reporter = MarkdownReporter::from_config(config);
            metrics.record_report(reporter.save(entries, date));
            out.write_all(console::render_summary(date, entries.len()).as_bytes())
        }
        OutputMode::Console => console::display(entries, out),
    }
}
