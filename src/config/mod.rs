//! Configuration management
//!
//! Configuration is an explicit [`InventoryConfig`] value built once at
//! startup and handed to each component by reference.
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [api]
//! base_url = "https://gateway.qg1.apps.qualys.com"
//! filter = "state:RUNNING"
//! page_size = 250
//!
//! [schedule]
//! utc_offset = "+00:00"
//! lookback_weeks = 52
//!
//! [report]
//! snapshot_dir = "weekly_reports"
//! table_dir = "weekly_csv_reports"
//! naming = "month_day"
//! ```
//!
//! The bearer token is never read from the file; export `QUALYS_TOKEN`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use weekly_inventory::config::resolve_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = resolve_config(None)?;
//! config.validate()?;
//! println!("Listing URL: {}", config.api.listing_url());
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, resolve_config, split_columns, DEFAULT_CONFIG_FILE, TOKEN_ENV};
pub use schema::{
    ApiConfig, ApplicationConfig, InventoryConfig, LoggingConfig, ReportConfig, ScheduleConfig,
    DATE_FORMAT, LISTING_PATH, MAX_END_OVERLAP_MINUTES, MAX_LOOKBACK_WEEKS,
};
pub use secret::{secret_string, SecretString, SecretValue};
