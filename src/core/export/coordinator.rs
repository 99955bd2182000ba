//! Report coordinator - main orchestrator for a run
//!
//! Bootstraps the output directories, resolves the date range, plans the
//! windows and then, one window at a time: builds the filter, paginates,
//! writes the snapshot and writes the CSV table.

use crate::adapters::inventory::ListingTransport;
use crate::adapters::report::ReportWriter;
use crate::config::InventoryConfig;
use crate::core::export::summary::{RunSummary, WindowError, WindowErrorKind};
use crate::core::fetch::{created_filter, Paginator};
use crate::core::state::{DateRange, ExistingReports, WeekPlanner};
use crate::core::transform::RowFlattener;
use crate::domain::{Result, Window};
use chrono::{Datelike, Duration, FixedOffset, NaiveDate, Utc};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Report coordinator
pub struct ReportCoordinator {
    paginator: Paginator,
    writer: ReportWriter,
    flattener: RowFlattener,
    planner: WeekPlanner,
    offset: FixedOffset,
    overlap: Duration,
    explicit_start: Option<NaiveDate>,
    explicit_end: Option<NaiveDate>,
    lookback_weeks: i64,
    extra_filter: Option<String>,
    persist_partial: bool,
}

impl ReportCoordinator {
    /// Create a coordinator from validated configuration
    pub fn new(config: &InventoryConfig, transport: Arc<dyn ListingTransport>) -> Result<Self> {
        Ok(Self {
            paginator: Paginator::new(transport, &config.api),
            writer: ReportWriter::new(&config.report),
            flattener: RowFlattener::new(config.report.column_schema()?),
            planner: WeekPlanner::new(config.schedule.step_days, config.report.naming),
            offset: config.schedule.offset()?,
            overlap: config.schedule.overlap()?,
            explicit_start: config.schedule.start()?,
            explicit_end: config.schedule.end()?,
            lookback_weeks: config.schedule.lookback_weeks,
            extra_filter: config.api.extra_filter().map(str::to_owned),
            persist_partial: config.report.persist_partial,
        })
    }

    /// Current calendar date at the configured offset
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }

    /// Resolve the run's date range without creating anything on disk
    ///
    /// Lets callers reject an empty or inverted range before logging or
    /// output directories are set up.
    pub fn date_range(config: &InventoryConfig, today: NaiveDate) -> Result<DateRange> {
        let existing = ExistingReports::scan(Path::new(&config.report.snapshot_dir), today.year())?;
        DateRange::resolve(
            config.schedule.start()?,
            config.schedule.end()?,
            today,
            config.schedule.lookback_weeks,
            &existing,
        )
    }

    /// Execute the run
    ///
    /// # Errors
    ///
    /// Returns an error when the date range is empty, the output directories
    /// cannot be prepared, or the API answers 401. An empty range is reported
    /// before any directory is created. Windows written before a 401 stay on
    /// disk and are skipped by the next run.
    pub async fn run(&self, today: NaiveDate) -> Result<RunSummary> {
        let start_time = Instant::now();
        let mut summary = RunSummary::new();

        let existing = ExistingReports::scan(self.writer.snapshot_dir(), today.year())?;
        let range = DateRange::resolve(
            self.explicit_start,
            self.explicit_end,
            today,
            self.lookback_weeks,
            &existing,
        )?;
        self.writer.bootstrap()?;

        if self.explicit_start.is_some() || self.explicit_end.is_some() {
            tracing::info!(range = %range, "Using provided date range");
        } else {
            tracing::info!(
                range = %range,
                lookback_weeks = self.lookback_weeks,
                "Using default workflow"
            );
        }
        if let Some(filter) = &self.extra_filter {
            tracing::info!(filter = %filter, "Using optional filter");
        }

        let plan = self.planner.plan(range, &existing)?;
        summary.windows_planned = plan.len();

        for planned in &plan {
            let name = planned.window.snapshot_name(self.writer.naming());
            if planned.existing {
                tracing::info!(file = %name, "Skipping existing report");
                summary.windows_skipped += 1;
                continue;
            }

            if let Err(e) = self
                .process_window(&planned.window, &name, today.year(), &mut summary)
                .await
            {
                tracing::error!(
                    file = %name,
                    error = %e,
                    records = summary.total_records,
                    "Run aborted"
                );
                return Err(e);
            }
        }

        Ok(summary.with_duration(start_time.elapsed()))
    }

    async fn process_window(
        &self,
        window: &Window,
        name: &str,
        run_year: i32,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let bounds = window.epoch_bounds(self.offset, self.overlap);
        let filter = created_filter(bounds, self.extra_filter.as_deref());
        tracing::info!(
            file = %name,
            window = %window,
            filter = %filter,
            "Fetching data"
        );

        let outcome = self.paginator.fetch(&filter).await?;
        summary.windows_fetched += 1;
        summary.pages_fetched += outcome.pages;
        summary.total_records += outcome.records.len();

        if let Some(failure) = &outcome.failure {
            summary.windows_partial += 1;
            summary.add_error(WindowError::new(
                *window,
                WindowErrorKind::Fetch,
                failure.to_string(),
            ));

            if !self.persist_partial {
                tracing::warn!(
                    file = %name,
                    records = outcome.records.len(),
                    "Partial window left unmaterialized, it will be retried next run"
                );
                summary.windows_failed += 1;
                return Ok(());
            }
            tracing::warn!(
                file = %name,
                records = outcome.records.len(),
                "Persisting partial window"
            );
        }

        if let Err(e) = self.writer.write_snapshot(window, &outcome.records) {
            tracing::error!(file = %name, error = %e, "Failed to write snapshot");
            summary.windows_failed += 1;
            summary.add_error(WindowError::new(
                *window,
                WindowErrorKind::Snapshot,
                e.to_string(),
            ));
            return Ok(());
        }

        match self
            .writer
            .write_table(window, &outcome.records, &self.flattener, run_year)
        {
            Ok(Some(table)) => summary.total_rows += table.rows,
            Ok(None) => {}
            Err(e) => {
                tracing::error!(file = %name, error = %e, "Failed to write CSV report");
                summary.add_error(WindowError::new(
                    *window,
                    WindowErrorKind::Table,
                    e.to_string(),
                ));
            }
        }

        tracing::info!(
            file = %name,
            containers = outcome.records.len(),
            "Window processed"
        );
        Ok(())
    }
}
