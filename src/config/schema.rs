//! Configuration schema types
//!
//! Every section has defaults, so an empty TOML document (or no file at all)
//! yields a usable configuration once the base URL and token are supplied.

use crate::config::SecretString;
use crate::domain::{ColumnSchema, Result as InventoryResult, WindowNaming, DEFAULT_COLUMNS};
use chrono::{Duration, FixedOffset, NaiveDate, Utc};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Path every listing request is sent to
pub const LISTING_PATH: &str = "/csapi/v1.3/containers/list";

/// Date format accepted for explicit range bounds
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Longest default lookback, about ten years
pub const MAX_LOOKBACK_WEEKS: i64 = 520;

/// Largest end-bound overlap, one day
pub const MAX_END_OVERLAP_MINUTES: i64 = 1440;

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Listing API connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Window planning
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Output files
    #[serde(default)]
    pub report: ReportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl InventoryConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid setting
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.api.validate()?;
        self.schedule.validate()?;
        self.report.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Listing API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the gateway, with or without the listing path
    #[serde(default)]
    pub base_url: String,

    /// Bearer token, only ever taken from the environment
    #[serde(skip)]
    pub token: Option<SecretString>,

    /// Additional filter expression conjoined with the time range
    #[serde(default)]
    pub filter: Option<String>,

    /// Records requested per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Pause before every page after the first
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Upper bound on pages followed for a single window
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Per-request timeout
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Verify the server certificate
    #[serde(default)]
    pub tls_verify: bool,
}

impl ApiConfig {
    /// Full listing URL, appending the listing path when it is missing
    pub fn listing_url(&self) -> String {
        let base = self.base_url.trim();
        if base.ends_with(LISTING_PATH) {
            base.to_string()
        } else {
            format!("{}{}", base.trim_end_matches('/'), LISTING_PATH)
        }
    }

    /// Additional filter, if one was given and is not blank
    pub fn extra_filter(&self) -> Option<&str> {
        self.filter
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }

    fn validate(&self) -> Result<(), String> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(
                "api.base_url is required (positional argument or WEEKLY_API_BASE_URL)"
                    .to_string(),
            );
        }

        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(format!(
                "api.base_url must start with http:// or https://, got '{base}'"
            ));
        }

        url::Url::parse(&self.listing_url())
            .map_err(|e| format!("api.base_url is not a valid URL: {e}"))?;

        match &self.token {
            Some(token) if !token.expose_secret().is_blank() => {}
            _ => {
                return Err(
                    "API token is missing. Set the QUALYS_TOKEN environment variable".to_string(),
                )
            }
        }

        if self.page_size == 0 || self.page_size > 10_000 {
            return Err(format!(
                "api.page_size must be between 1 and 10000, got {}",
                self.page_size
            ));
        }

        if self.max_pages == 0 {
            return Err("api.max_pages must be > 0".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: None,
            filter: None,
            page_size: default_page_size(),
            page_delay_ms: default_page_delay_ms(),
            max_pages: default_max_pages(),
            timeout_seconds: default_timeout_seconds(),
            tls_verify: false,
        }
    }
}

/// Window planning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Explicit range start (YYYY-MM-DD)
    #[serde(default)]
    pub start_date: Option<String>,

    /// Explicit range end (YYYY-MM-DD), exclusive
    #[serde(default)]
    pub end_date: Option<String>,

    /// Maximum window length in days
    #[serde(default = "default_step_days")]
    pub step_days: i64,

    /// Default range length when no start date is given
    #[serde(default = "default_lookback_weeks")]
    pub lookback_weeks: i64,

    /// Fixed offset used for calendar days, e.g. "+00:00" or "-05:00"
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,

    /// Margin added to a window's inclusive end bound
    #[serde(default = "default_end_overlap_minutes")]
    pub end_overlap_minutes: i64,
}

impl ScheduleConfig {
    /// Parsed time zone offset
    pub fn offset(&self) -> InventoryResult<FixedOffset> {
        self.utc_offset.trim().parse::<FixedOffset>().map_err(|e| {
            crate::domain::InventoryError::Configuration(format!(
                "Invalid schedule.utc_offset '{}': {e}",
                self.utc_offset
            ))
        })
    }

    /// Current calendar date at the configured offset
    pub fn today(&self) -> InventoryResult<NaiveDate> {
        Ok(Utc::now().with_timezone(&self.offset()?).date_naive())
    }

    /// End-bound overlap as a duration
    pub fn overlap(&self) -> InventoryResult<Duration> {
        if !(0..=MAX_END_OVERLAP_MINUTES).contains(&self.end_overlap_minutes) {
            return Err(crate::domain::InventoryError::Configuration(format!(
                "schedule.end_overlap_minutes must be between 0 and {MAX_END_OVERLAP_MINUTES}, got {}",
                self.end_overlap_minutes
            )));
        }
        Ok(Duration::minutes(self.end_overlap_minutes))
    }

    /// Parsed explicit start date
    pub fn start(&self) -> InventoryResult<Option<NaiveDate>> {
        parse_optional_date("start_date", self.start_date.as_deref())
    }

    /// Parsed explicit end date
    pub fn end(&self) -> InventoryResult<Option<NaiveDate>> {
        parse_optional_date("end_date", self.end_date.as_deref())
    }

    fn validate(&self) -> Result<(), String> {
        if !(1..=366).contains(&self.step_days) {
            return Err(format!(
                "schedule.step_days must be between 1 and 366, got {}",
                self.step_days
            ));
        }

        if !(1..=MAX_LOOKBACK_WEEKS).contains(&self.lookback_weeks) {
            return Err(format!(
                "schedule.lookback_weeks must be between 1 and {MAX_LOOKBACK_WEEKS}, got {}",
                self.lookback_weeks
            ));
        }

        self.overlap().map_err(|e| e.to_string())?;

        self.offset().map_err(|e| e.to_string())?;

        let start = self.start().map_err(|e| e.to_string())?;
        let end = self.end().map_err(|e| e.to_string())?;
        if let (Some(start), Some(end)) = (start, end) {
            if start >= end {
                return Err(format!(
                    "Start date {start} must be before end date {end}"
                ));
            }
        }

        Ok(())
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            step_days: default_step_days(),
            lookback_weeks: default_lookback_weeks(),
            utc_offset: default_utc_offset(),
            end_overlap_minutes: default_end_overlap_minutes(),
        }
    }
}

fn parse_optional_date(field: &str, value: Option<&str>) -> InventoryResult<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Some)
            .map_err(|_| {
                crate::domain::InventoryError::Configuration(format!(
                    "Invalid schedule.{field} '{raw}'. Expected YYYY-MM-DD"
                ))
            }),
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory of structured snapshots (the idempotency set)
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: String,

    /// Directory of flattened CSV tables
    #[serde(default = "default_table_dir")]
    pub table_dir: String,

    /// Staging directory for in-progress writes
    #[serde(default = "default_temp_dir")]
    pub temp_dir: String,

    /// Filename scheme
    #[serde(default)]
    pub naming: WindowNaming,

    /// Ordered CSV columns
    #[serde(default = "default_columns")]
    pub columns: Vec<String>,

    /// Materialize windows whose pagination stopped early
    #[serde(default = "default_true")]
    pub persist_partial: bool,
}

impl ReportConfig {
    /// Validated column schema
    pub fn column_schema(&self) -> InventoryResult<ColumnSchema> {
        ColumnSchema::new(self.columns.clone())
    }

    fn validate(&self) -> Result<(), String> {
        for (name, dir) in [
            ("report.snapshot_dir", &self.snapshot_dir),
            ("report.table_dir", &self.table_dir),
            ("report.temp_dir", &self.temp_dir),
        ] {
            if dir.trim().is_empty() {
                return Err(format!("{name} cannot be empty"));
            }
        }

        self.column_schema().map_err(|e| e.to_string())?;
        Ok(())
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: default_snapshot_dir(),
            table_dir: default_table_dir(),
            temp_dir: default_temp_dir(),
            naming: WindowNaming::default(),
            columns: default_columns(),
            persist_partial: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable the JSON log file
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Directory holding log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log file name prefix; a `_<YYYYmmdd_HHMM>.log` suffix is appended
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled = true".to_string());
        }
        if self.file_prefix.trim().is_empty() {
            return Err("logging.file_prefix cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            file_prefix: default_file_prefix(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_page_size() -> usize {
    250
}

fn default_page_delay_ms() -> u64 {
    200
}

fn default_max_pages() -> usize {
    10_000
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_step_days() -> i64 {
    7
}

fn default_lookback_weeks() -> i64 {
    52
}

fn default_utc_offset() -> String {
    "+00:00".to_string()
}

fn default_end_overlap_minutes() -> i64 {
    480
}

fn default_snapshot_dir() -> String {
    "weekly_reports".to_string()
}

fn default_table_dir() -> String {
    "weekly_csv_reports".to_string()
}

fn default_temp_dir() -> String {
    "temp_reports".to_string()
}

fn default_columns() -> Vec<String> {
    DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_file_prefix() -> String {
    "weekly_report".to_string()
}
