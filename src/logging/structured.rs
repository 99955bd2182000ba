//! Structured logging setup using tracing
//!
//! A human-readable console layer plus, when enabled, a JSON file layer
//! writing to `<local_path>/<file_prefix>_<YYYYmmdd_HHMM>.log`.
//!
//! # Example
//!
//! ```no_run
//! use weekly_inventory::logging::init_logging;
//! use weekly_inventory::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let guard = init_logging("info", &config).expect("Failed to initialize logging");
//! if let Some(path) = guard.log_file() {
//!     println!("Logs written to {}", path.display());
//! }
//! ```

use crate::config::LoggingConfig;
use crate::domain::{InventoryError, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Guard that must be kept alive for the duration of the program
/// to ensure logs are flushed properly
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
    log_file: Option<PathBuf>,
}

impl LoggingGuard {
    fn new(file_guard: Option<WorkerGuard>, log_file: Option<PathBuf>) -> Self {
        Self {
            _file_guard: file_guard,
            log_file,
        }
    }

    /// Path of the JSON log file, when file logging is enabled
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

/// Initialize the logging system based on configuration
///
/// `RUST_LOG` takes precedence over `log_level_str` when set.
///
/// # Errors
///
/// Returns a configuration error for an unknown level, an uncreatable log
/// directory, or when a global subscriber is already installed.
pub fn init_logging(log_level_str: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let log_level = parse_log_level(log_level_str)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("weekly_inventory={}", log_level)));

    let mut layers = Vec::new();

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(env_filter.clone());
    layers.push(console_layer.boxed());

    let (file_guard, log_file) = if config.local_enabled {
        std::fs::create_dir_all(&config.local_path).map_err(|e| {
            InventoryError::Configuration(format!(
                "Failed to create log directory {}: {}",
                config.local_path, e
            ))
        })?;

        let file_name = log_file_name(&config.file_prefix, Local::now());
        let file_appender = tracing_appender::rolling::never(&config.local_path, &file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_writer(non_blocking)
            .with_filter(env_filter);
        layers.push(file_layer.boxed());

        (Some(guard), Some(Path::new(&config.local_path).join(file_name)))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| {
            InventoryError::Configuration(format!("Failed to install log subscriber: {e}"))
        })?;

    tracing::debug!(
        local_enabled = config.local_enabled,
        log_file = ?log_file,
        "Logging initialized"
    );

    Ok(LoggingGuard::new(file_guard, log_file))
}

/// Log file name for a run started at `now`
pub fn log_file_name(prefix: &str, now: DateTime<Local>) -> String {
    format!("{}_{}.log", prefix, now.format("%Y%m%d_%H%M"))
}

/// Parse log level from string
fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(InventoryError::Configuration(format!(
            "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
            level_str
        ))),
    }
}
