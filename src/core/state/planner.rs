//! Window planning
//!
//! Splits `[start, end)` into consecutive windows of at most `step_days`
//! days and marks the ones whose snapshot already exists.

use super::existing::ExistingReports;
use crate::domain::{InventoryError, Result, Window, WindowNaming};
use chrono::{Duration, NaiveDate};
use std::fmt;

/// Overall date range of a run, end exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Resolve the run's range from explicit bounds and defaults
    ///
    /// The default end is `today`. The default start is the earlier of the
    /// oldest existing snapshot start and `today - lookback_weeks`. Either
    /// bound may be given on its own; the other is defaulted.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::InvalidDateRange`] when start is not before end,
    /// and a configuration error when the lookback leaves the calendar.
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
        lookback_weeks: i64,
        existing: &ExistingReports,
    ) -> Result<Self> {
        let end = end.unwrap_or(today);
        let start = match start {
            Some(start) => start,
            None => {
                let lookback = Duration::try_weeks(lookback_weeks)
                    .and_then(|weeks| today.checked_sub_signed(weeks))
                    .ok_or_else(|| {
                        InventoryError::Configuration(format!(
                            "Lookback of {lookback_weeks} weeks is out of range"
                        ))
                    })?;
                existing
                    .oldest_start()
                    .map_or(lookback, |oldest| oldest.min(lookback))
            }
        };

        if start >= end {
            return Err(InventoryError::InvalidDateRange(format!(
                "start {start} must be before end {end}"
            )));
        }
        Ok(Self { start, end })
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.start, self.end)
    }
}

/// A window together with whether its snapshot already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedWindow {
    pub window: Window,
    pub existing: bool,
}

/// Computes the ordered window list for a run
#[derive(Debug, Clone, Copy)]
pub struct WeekPlanner {
    step_days: i64,
    naming: WindowNaming,
}

impl WeekPlanner {
    pub fn new(step_days: i64, naming: WindowNaming) -> Self {
        Self { step_days, naming }
    }

    /// Partition `[start, end)` into contiguous windows, the last one clamped
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::InvalidDateRange`] if `start >= end` or the
    /// step is not positive.
    pub fn windows(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Window>> {
        if start >= end {
            return Err(InventoryError::InvalidDateRange(format!(
                "No valid date range selected: {start} -> {end}"
            )));
        }
        if self.step_days < 1 {
            return Err(InventoryError::InvalidDateRange(format!(
                "Window step must be at least one day, got {}",
                self.step_days
            )));
        }

        let step = Duration::days(self.step_days);
        let mut windows = Vec::new();
        let mut current = start;
        while current < end {
            let next = (current + step).min(end);
            windows.push(Window::new(current, next)?);
            current = next;
        }
        Ok(windows)
    }

    /// Windows for `range`, each flagged when its snapshot is already present
    pub fn plan(&self, range: DateRange, existing: &ExistingReports) -> Result<Vec<PlannedWindow>> {
        Ok(self
            .windows(range.start, range.end)?
            .into_iter()
            .map(|window| PlannedWindow {
                existing: existing.contains_window(&window, self.naming),
                window,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn planner() -> WeekPlanner {
        WeekPlanner::new(7, WindowNaming::MonthDay)
    }

    #[test]
    fn test_last_window_clamped() {
        let windows = planner()
            .windows(date(2024, 1, 1), date(2024, 1, 20))
            .unwrap();

        let bounds: Vec<_> = windows.iter().map(|w| (w.start(), w.end())).collect();
        assert_eq!(
            bounds,
            vec![
                (date(2024, 1, 1), date(2024, 1, 8)),
                (date(2024, 1, 8), date(2024, 1, 15)),
                (date(2024, 1, 15), date(2024, 1, 20)),
            ]
        );
        assert_eq!(windows[2].days(), 5);
    }

    #[test]
    fn test_windows_contiguous() {
        let windows = planner()
            .windows(date(2023, 11, 3), date(2024, 2, 29))
            .unwrap();

        assert_eq!(windows.first().unwrap().start(), date(2023, 11, 3));
        assert_eq!(windows.last().unwrap().end(), date(2024, 2, 29));
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
            assert!(pair[0].days() <= 7);
        }
    }

    #[test]
    fn test_inverted_range_rejected() {
        let result = planner().windows(date(2024, 1, 8), date(2024, 1, 1));
        assert!(matches!(result, Err(InventoryError::InvalidDateRange(_))));

        let result = planner().windows(date(2024, 1, 8), date(2024, 1, 8));
        assert!(matches!(result, Err(InventoryError::InvalidDateRange(_))));
    }

    #[test]
    fn test_plan_marks_existing() {
        let mut existing = ExistingReports::default();
        existing.insert("Jan08-Jan15.json", 2024);
        let range = DateRange {
            start: date(2024, 1, 1),
            end: date(2024, 1, 20),
        };

        let plan = planner().plan(range, &existing).unwrap();
        let flags: Vec<_> = plan.iter().map(|p| p.existing).collect();
        assert_eq!(flags, vec![false, true, false]);

        let again = planner().plan(range, &existing).unwrap();
        assert_eq!(plan, again);
    }

    #[test]
    fn test_default_range_uses_lookback() {
        let today = date(2024, 6, 1);
        let range =
            DateRange::resolve(None, None, today, 52, &ExistingReports::default()).unwrap();
        assert_eq!(range.end, today);
        assert_eq!(range.start, today - Duration::weeks(52));
    }

    #[test]
    fn test_default_range_extends_to_oldest_snapshot() {
        let mut existing = ExistingReports::default();
        existing.insert("2022Mar01-2022Mar08.json", 2024);

        let range = DateRange::resolve(None, None, date(2024, 6, 1), 52, &existing).unwrap();
        assert_eq!(range.start, date(2022, 3, 1));
    }

    #[test]
    fn test_single_bound_filled_from_default() {
        let today = date(2024, 6, 1);
        let existing = ExistingReports::default();

        let range = DateRange::resolve(Some(date(2024, 5, 1)), None, today, 52, &existing).unwrap();
        assert_eq!(range.end, today);

        let range = DateRange::resolve(None, Some(date(2024, 3, 1)), today, 52, &existing).unwrap();
        assert_eq!(range.start, today - Duration::weeks(52));
    }

    #[test]
    fn test_out_of_range_lookback_is_an_error() {
        let result = DateRange::resolve(
            None,
            None,
            date(2024, 6, 1),
            100_000_000,
            &ExistingReports::default(),
        );
        assert!(matches!(result, Err(InventoryError::Configuration(_))));

        let result =
            DateRange::resolve(None, None, date(2024, 6, 1), i64::MAX, &ExistingReports::default());
        assert!(matches!(result, Err(InventoryError::Configuration(_))));
    }

    #[test]
    fn test_explicit_range_inverted() {
        let result = DateRange::resolve(
            Some(date(2024, 6, 2)),
            None,
            date(2024, 6, 1),
            52,
            &ExistingReports::default(),
        );
        assert!(matches!(result, Err(InventoryError::InvalidDateRange(_))));
    }
}
