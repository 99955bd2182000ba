//! Domain models and types.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Windows** ([`Window`], [`WindowNaming`]): the unit of fetch/report work
//!   and its canonical filename, which doubles as the idempotency key
//! - **Column schema** ([`ColumnSchema`]): the fixed ordered output columns
//! - **Records** ([`Record`]): container snapshots as returned by the API
//! - **Error types** ([`InventoryError`], [`ApiError`]) and [`Result`]
//!
//! Records are third-party data of variable shape, so they stay as
//! [`serde_json::Value`] and are only ever read through the path resolver.
//!
//! ```rust
//! use weekly_inventory::domain::{Window, WindowNaming};
//! use chrono::NaiveDate;
//!
//! # fn example() -> weekly_inventory::domain::Result<()> {
//! let window = Window::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
//! )?;
//! assert_eq!(window.snapshot_name(WindowNaming::MonthDay), "Jan01-Jan08.json");
//! # Ok(())
//! # }
//! ```

pub mod columns;
pub mod errors;
pub mod result;
pub mod window;

pub use columns::{ColumnSchema, DEFAULT_COLUMNS, FINDING_PREFIX};
pub use errors::{ApiError, InventoryError};
pub use result::Result;
pub use window::{parse_snapshot_name, EpochBounds, Window, WindowNaming};

/// One container inventory record, immutable once fetched
pub type Record = serde_json::Value;
