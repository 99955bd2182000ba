//! CLI interface and argument parsing
//!
//! One positional argument (the gateway base URL) plus optional overrides.
//! Flags take precedence over the configuration file and `WEEKLY_*`
//! environment variables.

pub mod run;

use crate::config::{split_columns, InventoryConfig};
use clap::Parser;
use std::path::PathBuf;

/// Weekly container inventory extractor
#[derive(Parser, Debug)]
#[command(name = "weekly-inventory")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Gateway URL (e.g. https://gateway.qg2.apps.qualys.com)
    #[arg(value_name = "BASE_URL")]
    pub base_url: Option<String>,

    /// Additional filter combined with the created range filter
    #[arg(long, alias = "optional_filter")]
    pub optional_filter: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long, alias = "start_date", value_name = "YYYY-MM-DD")]
    pub start_date: Option<String>,

    /// End date (YYYY-MM-DD), exclusive
    #[arg(long, alias = "end_date", value_name = "YYYY-MM-DD")]
    pub end_date: Option<String>,

    /// Comma-separated CSV columns replacing the defaults
    #[arg(long, alias = "csv_columns", value_name = "COLUMNS")]
    pub csv_columns: Option<String>,

    /// Path to configuration file
    #[arg(short, long, env = "WEEKLY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "WEEKLY_LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Apply flag overrides; blank values are ignored
    pub fn apply_overrides(&self, config: &mut InventoryConfig) {
        if let Some(url) = non_blank(&self.base_url) {
            config.api.base_url = url.to_string();
        }
        if let Some(filter) = non_blank(&self.optional_filter) {
            config.api.filter = Some(filter.to_string());
        }
        if let Some(start) = non_blank(&self.start_date) {
            config.schedule.start_date = Some(start.to_string());
        }
        if let Some(end) = non_blank(&self.end_date) {
            config.schedule.end_date = Some(end.to_string());
        }
        if let Some(columns) = non_blank(&self.csv_columns) {
            config.report.columns = split_columns(columns);
        }
        if let Some(level) = non_blank(&self.log_level) {
            config.application.log_level = level.to_lowercase();
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
