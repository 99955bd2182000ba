//! Reporting windows
//!
//! A [`Window`] is a half-open `[start, end)` span of calendar dates. Its
//! canonical snapshot filename is the only idempotency key the extractor uses,
//! so the naming functions here must stay stable across releases.

use super::errors::InventoryError;
use super::result::Result;
use chrono::{Duration, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Extension of structured snapshot files
pub const SNAPSHOT_EXTENSION: &str = "json";

/// Extension of tabular report files
pub const TABLE_EXTENSION: &str = "csv";

/// How window filenames are derived from their dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowNaming {
    /// `Jan01-Jan08.json`: abbreviated month and day, no year
    ///
    /// Two windows a year apart with the same month/day text share a name,
    /// and the later one is treated as already materialized.
    #[default]
    MonthDay,
    /// `2024Jan01-2024Jan08.json`: year-qualified, collision free
    WithYear,
}

impl FromStr for WindowNaming {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "month_day" | "monthday" => Ok(Self::MonthDay),
            "with_year" | "withyear" => Ok(Self::WithYear),
            _ => Err(InventoryError::Configuration(format!(
                "Invalid window naming: {s}. Expected 'month_day' or 'with_year'"
            ))),
        }
    }
}

impl fmt::Display for WindowNaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MonthDay => write!(f, "month_day"),
            Self::WithYear => write!(f, "with_year"),
        }
    }
}

/// Inclusive millisecond epoch bounds used in the `created:[a ... b]` filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochBounds {
    /// First millisecond of the window start date
    pub start_ms: i64,
    /// Last millisecond before the window end date, plus the overlap margin
    pub end_ms: i64,
}

/// A half-open `[start, end)` span of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Window {
    start: NaiveDate,
    end: NaiveDate,
}

impl Window {
    /// Create a window, rejecting empty or inverted spans
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start >= end {
            return Err(InventoryError::InvalidDateRange(format!(
                "window end ({end}) must be after start ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Inclusive start date
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Exclusive end date
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Length of the window in days
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Canonical snapshot filename, e.g. `Jan01-Jan08.json`
    pub fn snapshot_name(&self, naming: WindowNaming) -> String {
        format!("{}.{SNAPSHOT_EXTENSION}", self.stem(naming))
    }

    /// Tabular report filename, e.g. `Jan01-Jan08_2024.csv`
    ///
    /// Month/day names get a `_<run_year>` suffix: the year the run happens
    /// in, not the window's own year. Year-qualified names need no suffix.
    pub fn table_name(&self, naming: WindowNaming, run_year: i32) -> String {
        match naming {
            WindowNaming::MonthDay => {
                format!("{}_{run_year}.{TABLE_EXTENSION}", self.stem(naming))
            }
            WindowNaming::WithYear => format!("{}.{TABLE_EXTENSION}", self.stem(naming)),
        }
    }

    fn stem(&self, naming: WindowNaming) -> String {
        let pattern = match naming {
            WindowNaming::MonthDay => "%b%d",
            WindowNaming::WithYear => "%Y%b%d",
        };
        format!(
            "{}-{}",
            self.start.format(pattern),
            self.end.format(pattern)
        )
    }

    /// Convert the window to epoch bounds at a fixed UTC offset
    ///
    /// The start bound is midnight of the start date. The end bound is one
    /// millisecond before midnight of the end date, extended by `overlap`.
    pub fn epoch_bounds(&self, offset: FixedOffset, overlap: Duration) -> EpochBounds {
        let start_ms = midnight_millis(self.start, offset);
        let end_ms = midnight_millis(self.end, offset) - 1 + overlap.num_milliseconds();
        EpochBounds { start_ms, end_ms }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.start, self.end)
    }
}

fn midnight_millis(date: NaiveDate, offset: FixedOffset) -> i64 {
    let local = date.and_time(NaiveTime::MIN);
    let utc = local - Duration::seconds(i64::from(offset.local_minus_utc()));
    utc.and_utc().timestamp_millis()
}

/// Parse a snapshot filename back into its `(start, end)` dates
///
/// Accepts both naming schemes. Month/day names carry no year, so
/// `reference_year` is assumed for both dates. Returns `None` for anything
/// that isn't a snapshot name.
pub fn parse_snapshot_name(name: &str, reference_year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let stem = name.strip_suffix(&format!(".{SNAPSHOT_EXTENSION}"))?;
    let (start, end) = stem.split_once('-')?;
    if end.contains('-') {
        return None;
    }

    let with_year = |s: &str| NaiveDate::parse_from_str(s, "%Y%b%d").ok();
    let month_day =
        |s: &str| NaiveDate::parse_from_str(&format!("{s}{reference_year}"), "%b%d%Y").ok();

    match (with_year(start), with_year(end)) {
        (Some(s), Some(e)) => Some((s, e)),
        _ => Some((month_day(start)?, month_day(end)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_rejects_inverted_range() {
        assert!(Window::new(date(2024, 1, 8), date(2024, 1, 1)).is_err());
        assert!(Window::new(date(2024, 1, 8), date(2024, 1, 8)).is_err());
    }

    #[test]
    fn test_snapshot_name_month_day() {
        let window = Window::new(date(2024, 1, 1), date(2024, 1, 8)).unwrap();
        assert_eq!(window.snapshot_name(WindowNaming::MonthDay), "Jan01-Jan08.json");
        assert_eq!(window.table_name(WindowNaming::MonthDay, 2024), "Jan01-Jan08_2024.csv");
    }

    #[test]
    fn test_table_name_uses_run_year() {
        let window = Window::new(date(2023, 12, 25), date(2024, 1, 1)).unwrap();
        assert_eq!(window.table_name(WindowNaming::MonthDay, 2024), "Dec25-Jan01_2024.csv");

        let last_year = Window::new(date(2023, 3, 4), date(2023, 3, 11)).unwrap();
        assert_eq!(
            last_year.table_name(WindowNaming::MonthDay, 2024),
            "Mar04-Mar11_2024.csv"
        );
    }

    #[test]
    fn test_snapshot_name_with_year() {
        let window = Window::new(date(2024, 12, 30), date(2025, 1, 6)).unwrap();
        assert_eq!(
            window.snapshot_name(WindowNaming::WithYear),
            "2024Dec30-2025Jan06.json"
        );
        assert_eq!(
            window.table_name(WindowNaming::WithYear, 2030),
            "2024Dec30-2025Jan06.csv"
        );
    }

    #[test]
    fn test_month_day_names_collide_across_years() {
        let this_year = Window::new(date(2024, 3, 4), date(2024, 3, 11)).unwrap();
        let last_year = Window::new(date(2023, 3, 4), date(2023, 3, 11)).unwrap();
        assert_eq!(
            this_year.snapshot_name(WindowNaming::MonthDay),
            last_year.snapshot_name(WindowNaming::MonthDay)
        );
        assert_ne!(
            this_year.snapshot_name(WindowNaming::WithYear),
            last_year.snapshot_name(WindowNaming::WithYear)
        );
    }

    #[test]
    fn test_epoch_bounds_utc() {
        let window = Window::new(date(2024, 1, 1), date(2024, 1, 8)).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        let bounds = window.epoch_bounds(utc, Duration::zero());

        assert_eq!(bounds.start_ms, 1_704_067_200_000);
        assert_eq!(bounds.end_ms, 1_704_672_000_000 - 1);
    }

    #[test]
    fn test_epoch_bounds_offset_and_overlap() {
        let window = Window::new(date(2024, 1, 1), date(2024, 1, 8)).unwrap();
        let plus_ten = FixedOffset::east_opt(10 * 3600).unwrap();
        let bounds = window.epoch_bounds(plus_ten, Duration::hours(8));

        assert_eq!(bounds.start_ms, 1_704_067_200_000 - 10 * 3_600_000);
        assert_eq!(
            bounds.end_ms,
            1_704_672_000_000 - 10 * 3_600_000 - 1 + 8 * 3_600_000
        );
    }

    #[test]
    fn test_parse_snapshot_name_month_day() {
        let parsed = parse_snapshot_name("Jan01-Jan08.json", 2024).unwrap();
        assert_eq!(parsed, (date(2024, 1, 1), date(2024, 1, 8)));
    }

    #[test]
    fn test_parse_snapshot_name_with_year() {
        let parsed = parse_snapshot_name("2023Dec25-2024Jan01.json", 2030).unwrap();
        assert_eq!(parsed, (date(2023, 12, 25), date(2024, 1, 1)));
    }

    #[test]
    fn test_parse_snapshot_name_rejects_other_files() {
        assert!(parse_snapshot_name("notes.txt", 2024).is_none());
        assert!(parse_snapshot_name("Jan01-Jan08_2024.csv", 2024).is_none());
        assert!(parse_snapshot_name("Foo01-Jan08.json", 2024).is_none());
        assert!(parse_snapshot_name("Jan01-Jan08-Jan15.json", 2024).is_none());
    }

    #[test]
    fn test_window_naming_from_str() {
        assert_eq!(
            WindowNaming::from_str("month_day").unwrap(),
            WindowNaming::MonthDay
        );
        assert_eq!(
            WindowNaming::from_str("WITH_YEAR").unwrap(),
            WindowNaming::WithYear
        );
        assert!(WindowNaming::from_str("weekly").is_err());
    }
}
