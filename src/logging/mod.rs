//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - human-readable console output
//! - JSON log file per run
//! - `RUST_LOG` or configured level filtering
//!
//! # Example
//!
//! ```no_run
//! use weekly_inventory::logging::init_logging;
//! use weekly_inventory::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(file = "Jan01-Jan08.json", "Skipping existing report");
//! ```

pub mod structured;

pub use structured::{init_logging, log_file_name, LoggingGuard};
