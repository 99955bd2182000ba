// Window planning and the on-disk idempotency set

pub mod existing;
pub mod planner;

pub use existing::ExistingReports;
pub use planner::{DateRange, PlannedWindow, WeekPlanner};
