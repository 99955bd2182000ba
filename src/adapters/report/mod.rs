//! Filesystem report output
//!
//! One structured snapshot per window (the idempotency marker) and, when the
//! window has records, one flattened CSV table.

pub mod writer;

pub use writer::{ReportWriter, TableReport};
