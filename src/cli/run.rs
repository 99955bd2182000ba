//! Report run command
//!
//! Resolves and validates configuration before any side effect, then sets up
//! logging and drives the coordinator. Returns the process exit code.

use crate::adapters::inventory::HttpListingTransport;
use crate::cli::Cli;
use crate::config::resolve_config;
use crate::core::export::{ReportCoordinator, RunSummary};
use crate::logging::init_logging;
use std::sync::Arc;

/// Exit code for configuration, date range and authorization failures
pub const EXIT_FAILURE: i32 = 1;

/// Execute a report run
pub async fn execute(cli: &Cli) -> anyhow::Result<i32> {
    let mut config = match resolve_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[ERROR] {e}");
            return Ok(EXIT_FAILURE);
        }
    };
    cli.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        eprintln!("[ERROR] Configuration validation failed: {e}");
        return Ok(EXIT_FAILURE);
    }

    // A single explicit bound can still yield an empty range
    let today = config.schedule.today()?;
    if let Err(e) = ReportCoordinator::date_range(&config, today) {
        eprintln!("[ERROR] {e}");
        return Ok(EXIT_FAILURE);
    }

    let guard = init_logging(&config.application.log_level, &config.logging)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        endpoint = %config.api.listing_url(),
        "Weekly container inventory"
    );

    let transport = Arc::new(HttpListingTransport::new(&config.api)?);
    let coordinator = ReportCoordinator::new(&config, transport)?;

    let summary = match coordinator.run(today).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            eprintln!("[ERROR] {e}");
            return Ok(EXIT_FAILURE);
        }
    };

    summary.log_summary();
    print_summary(&summary);
    if let Some(path) = guard.log_file() {
        tracing::info!(path = %path.display(), "Logs written");
        println!("Logs written to {}", path.display());
    }

    Ok(0)
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("Run Summary:");
    println!("  Windows planned: {}", summary.windows_planned);
    println!("  Skipped (existing): {}", summary.windows_skipped);
    println!("  Fetched: {}", summary.windows_fetched);
    println!("  Partial: {}", summary.windows_partial);
    println!("  Not written: {}", summary.windows_failed);
    println!("  Pages: {}", summary.pages_fetched);
    println!("  Containers: {}", summary.total_records);
    println!("  CSV rows: {}", summary.total_rows);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());

    if !summary.errors.is_empty() {
        println!();
        println!("Window errors:");
        for error in &summary.errors {
            println!("  - {error}");
        }
    }
    println!();
}
