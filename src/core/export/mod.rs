//! Run orchestration
//!
//! - [`coordinator`]: drives planning, fetching and writing window by window
//! - [`summary`]: counts and window-level errors reported at the end of a run

pub mod coordinator;
pub mod summary;

pub use coordinator::ReportCoordinator;
pub use summary::{RunSummary, WindowError, WindowErrorKind};
