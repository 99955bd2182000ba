//! Core business logic
//!
//! # Modules
//!
//! - [`export`] - Run orchestration and the run summary
//! - [`fetch`] - Filter construction and cursor-following pagination
//! - [`state`] - Window planning and the on-disk idempotency set
//! - [`transform`] - Path resolution, sanitization and row flattening
//!
//! # Workflow
//!
//! 1. **Bootstrap**: create the snapshot, table and temp directories
//! 2. **Scan**: list existing snapshots to build the idempotency set
//! 3. **Plan**: split the date range into windows of at most a week
//! 4. **Fetch**: page through the listing for each pending window
//! 5. **Write**: persist the snapshot, then the flattened CSV
//! 6. **Report**: log the run summary
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use weekly_inventory::adapters::inventory::HttpListingTransport;
//! use weekly_inventory::config::resolve_config;
//! use weekly_inventory::core::export::ReportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = resolve_config(None)?;
//! config.validate()?;
//!
//! let transport = Arc::new(HttpListingTransport::new(&config.api)?);
//! let coordinator = ReportCoordinator::new(&config, transport)?;
//! let summary = coordinator.run(coordinator.today()).await?;
//!
//! println!("Containers: {}", summary.total_records);
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod fetch;
pub mod state;
pub mod transform;
