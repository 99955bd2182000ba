//! Record transformation for the tabular report
//!
//! - [`path`]: total dotted/indexed path resolution against nested records
//! - [`sanitize`]: cell normalization
//! - [`flatten`]: one-to-many expansion of a record and its findings into rows

pub mod flatten;
pub mod path;
pub mod sanitize;

pub use flatten::{Row, RowFlattener, Rows, FINDINGS_FIELD};
pub use path::resolve_path;
pub use sanitize::{sanitize_str, sanitize_value};
