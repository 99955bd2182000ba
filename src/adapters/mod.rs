//! External integrations
//!
//! - [`inventory`]: the container listing API (transport trait + reqwest client)
//! - [`report`]: snapshot and CSV files on the local filesystem

pub mod inventory;
pub mod report;
