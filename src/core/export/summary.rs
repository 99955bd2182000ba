//! Run summary and reporting
//!
//! Tracks per-window outcomes across a run. Window-level failures are
//! collected here instead of being propagated.

use crate::domain::Window;
use std::fmt;
use std::time::Duration;

/// Summary of a report run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Windows in the resolved date range
    pub windows_planned: usize,

    /// Windows whose snapshot already existed
    pub windows_skipped: usize,

    /// Windows for which pagination was attempted
    pub windows_fetched: usize,

    /// Fetched windows whose pagination stopped early
    pub windows_partial: usize,

    /// Fetched windows left without a snapshot
    pub windows_failed: usize,

    /// Records fetched across all windows
    pub total_records: usize,

    /// CSV data rows written across all windows
    pub total_rows: usize,

    /// Listing requests that returned a response
    pub pages_fetched: usize,

    /// Wall-clock duration of the run
    pub duration: Duration,

    /// Window-level errors, in the order they happened
    pub errors: Vec<WindowError>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add an error
    pub fn add_error(&mut self, error: WindowError) {
        self.errors.push(error);
    }

    /// True when every fetched window completed and was written
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            windows_planned = self.windows_planned,
            windows_skipped = self.windows_skipped,
            windows_fetched = self.windows_fetched,
            windows_partial = self.windows_partial,
            windows_failed = self.windows_failed,
            pages = self.pages_fetched,
            rows = self.total_rows,
            duration_secs = self.duration.as_secs(),
            "Total number of containers found in this run: {}",
            self.total_records
        );

        if !self.errors.is_empty() {
            tracing::warn!(
                error_count = self.errors.len(),
                "Run completed with window errors"
            );
            for error in &self.errors {
                tracing::warn!(
                    window = %error.window,
                    kind = %error.kind,
                    message = %error.message,
                    "Window error"
                );
            }
        }
    }
}

/// Stage at which a window failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowErrorKind {
    /// Pagination stopped before the last page
    Fetch,
    /// The structured snapshot could not be written
    Snapshot,
    /// The CSV table could not be written
    Table,
}

impl fmt::Display for WindowErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WindowErrorKind::Fetch => "fetch",
            WindowErrorKind::Snapshot => "snapshot",
            WindowErrorKind::Table => "table",
        };
        f.write_str(name)
    }
}

/// Recoverable failure tied to one window
#[derive(Debug, Clone)]
pub struct WindowError {
    pub window: Window,
    pub kind: WindowErrorKind,
    pub message: String,
}

impl WindowError {
    pub fn new(window: Window, kind: WindowErrorKind, message: impl Into<String>) -> Self {
        Self {
            window,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.window, self.kind, self.message)
    }
}
