// Weekly Inventory - Container inventory to weekly CSV extractor
// Copyright (c) 2025 Weekly Inventory Contributors
// Licensed under the MIT License

//! # Weekly Inventory
//!
//! Incremental, idempotent weekly extraction of container inventory records
//! from a paged listing API, flattened into one CSV row per vulnerability
//! finding.
//!
//! ## Overview
//!
//! - **Windows**: the date range is split into weeks; a week whose snapshot
//!   file already exists is never fetched again
//! - **Pagination**: each week's listing is followed through `Link` headers
//! - **Flattening**: a record with N findings becomes N rows sharing the
//!   record-level columns; a record with none becomes one row
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and the run command
//! - [`core`] - Planning, pagination, flattening and orchestration
//! - [`adapters`] - Listing API transport and report files
//! - [`domain`] - Windows, column schema and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use weekly_inventory::adapters::inventory::HttpListingTransport;
//! use weekly_inventory::config::resolve_config;
//! use weekly_inventory::core::export::ReportCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = resolve_config(None)?;
//!     config.api.base_url = "https://gateway.qg2.apps.qualys.com".to_string();
//!     config.validate()?;
//!
//!     let transport = Arc::new(HttpListingTransport::new(&config.api)?);
//!     let coordinator = ReportCoordinator::new(&config, transport)?;
//!     let summary = coordinator.run(coordinator.today()).await?;
//!
//!     println!("Fetched {} containers", summary.total_records);
//!     Ok(())
//! }
//! ```
//!
//! ## Flattening
//!
//! ```rust
//! use serde_json::json;
//! use weekly_inventory::core::transform::RowFlattener;
//! use weekly_inventory::domain::ColumnSchema;
//!
//! let schema = ColumnSchema::parse_list("containerId,vuln_qid").unwrap();
//! let flattener = RowFlattener::new(schema);
//! let record = json!({
//!     "containerId": "c-1",
//!     "vulnerabilities": [{ "qid": 101 }, { "qid": 202 }]
//! });
//!
//! let rows: Vec<Vec<String>> = flattener.rows(&record).map(|r| r.into_values()).collect();
//! assert_eq!(rows, vec![vec!["c-1", "101"], vec!["c-1", "202"]]);
//! ```
//!
//! ## Error Handling
//!
//! All library operations return [`domain::Result`]. Only configuration,
//! date range and authorization errors end a run; other failures are
//! recorded per window in the run summary.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
