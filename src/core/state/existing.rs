//! Idempotency set of already materialized windows
//!
//! The snapshot directory is listed once per run. A window whose snapshot
//! filename is present is treated as done and never fetched again.

use crate::domain::{parse_snapshot_name, InventoryError, Result, Window, WindowNaming};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Snapshot filenames found on disk, with the dates parsed from each
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingReports {
    files: BTreeMap<String, (NaiveDate, NaiveDate)>,
}

impl ExistingReports {
    /// List `dir` and keep every filename that parses as a snapshot name
    ///
    /// Month/day names are resolved against `reference_year`. A missing
    /// directory yields an empty set.
    pub fn scan(dir: &Path, reference_year: i32) -> Result<Self> {
        let mut reports = Self::default();
        if !dir.exists() {
            return Ok(reports);
        }

        let entries = fs::read_dir(dir).map_err(|e| {
            InventoryError::Io(format!("Failed to list {}: {e}", dir.display()))
        })?;

        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            reports.insert(name, reference_year);
        }

        tracing::debug!(
            dir = %dir.display(),
            count = reports.len(),
            "Existing snapshots scanned"
        );
        Ok(reports)
    }

    /// Record a filename; returns false when it is not a snapshot name
    pub fn insert(&mut self, name: impl Into<String>, reference_year: i32) -> bool {
        let name = name.into();
        match parse_snapshot_name(&name, reference_year) {
            Some(dates) => {
                self.files.insert(name, dates);
                true
            }
            None => false,
        }
    }

    /// Whether a snapshot with exactly this filename exists
    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// Whether the window's snapshot exists under the given naming scheme
    pub fn contains_window(&self, window: &Window, naming: WindowNaming) -> bool {
        self.contains(&window.snapshot_name(naming))
    }

    /// Earliest start date among the existing snapshots
    pub fn oldest_start(&self) -> Option<NaiveDate> {
        self.files.values().map(|(start, _)| *start).min()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let root = TempDir::new().unwrap();
        let reports = ExistingReports::scan(&root.path().join("absent"), 2024).unwrap();
        assert!(reports.is_empty());
        assert_eq!(reports.oldest_start(), None);
    }

    #[test]
    fn test_scan_ignores_unparsable_names() {
        let root = TempDir::new().unwrap();
        for name in ["Jan01-Jan08.json", "Mar04-Mar11.json", "notes.txt", "Foo-Bar.json"] {
            fs::write(root.path().join(name), "[]").unwrap();
        }
        fs::create_dir(root.path().join("Feb01-Feb08.json")).unwrap();

        let reports = ExistingReports::scan(root.path(), 2024).unwrap();

        assert_eq!(reports.len(), 2);
        assert!(reports.contains("Jan01-Jan08.json"));
        assert!(reports.contains("Mar04-Mar11.json"));
        assert!(!reports.contains("Feb01-Feb08.json"));
        assert_eq!(reports.oldest_start(), Some(date(2024, 1, 1)));
    }

    #[test]
    fn test_both_naming_schemes_parse() {
        let mut reports = ExistingReports::default();
        assert!(reports.insert("2023Dec25-2024Jan01.json", 2024));
        assert!(reports.insert("Feb05-Feb12.json", 2024));

        assert_eq!(reports.oldest_start(), Some(date(2023, 12, 25)));
    }

    #[test]
    fn test_contains_window_is_filename_based() {
        let mut reports = ExistingReports::default();
        reports.insert("Jan01-Jan08.json", 2025);

        let last_year = Window::new(date(2024, 1, 1), date(2024, 1, 8)).unwrap();
        assert!(reports.contains_window(&last_year, WindowNaming::MonthDay));
        assert!(!reports.contains_window(&last_year, WindowNaming::WithYear));
    }

    #[test]
    fn test_scan_is_stable() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("Jan01-Jan08.json"), "[]").unwrap();

        let first = ExistingReports::scan(root.path(), 2024).unwrap();
        let second = ExistingReports::scan(root.path(), 2024).unwrap();
        assert_eq!(first, second);
    }
}
