//! Snapshot and table writer
//!
//! Every file is written into the temp directory first and then moved under
//! its final name, so a crash mid-write never leaves a partial file that the
//! idempotency scan would mistake for a completed window.

use crate::config::ReportConfig;
use crate::core::transform::RowFlattener;
use crate::domain::{InventoryError, Record, Result, Window, WindowNaming};
use csv::{QuoteStyle, WriterBuilder};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Outcome of writing one window's table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    /// Final path of the CSV file
    pub path: PathBuf,

    /// Data rows written, header excluded
    pub rows: usize,
}

/// Persists per-window snapshots and flattened tables
#[derive(Debug, Clone)]
pub struct ReportWriter {
    snapshot_dir: PathBuf,
    table_dir: PathBuf,
    temp_dir: PathBuf,
    naming: WindowNaming,
}

impl ReportWriter {
    /// Create a writer from report configuration
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            snapshot_dir: PathBuf::from(&config.snapshot_dir),
            table_dir: PathBuf::from(&config.table_dir),
            temp_dir: PathBuf::from(&config.temp_dir),
            naming: config.naming,
        }
    }

    /// Create the snapshot, table and temp directories
    pub fn bootstrap(&self) -> Result<()> {
        for dir in [&self.snapshot_dir, &self.table_dir, &self.temp_dir] {
            fs::create_dir_all(dir).map_err(|e| {
                InventoryError::Io(format!("Failed to create directory {}: {e}", dir.display()))
            })?;
        }
        Ok(())
    }

    /// Directory holding the structured snapshots
    pub fn snapshot_dir(&self) -> &Path {
        &self.snapshot_dir
    }

    /// Filename scheme in use
    pub fn naming(&self) -> WindowNaming {
        self.naming
    }

    /// Final path of a window's snapshot
    pub fn snapshot_path(&self, window: &Window) -> PathBuf {
        self.snapshot_dir.join(window.snapshot_name(self.naming))
    }

    /// Final path of a window's table for a run in `run_year`
    pub fn table_path(&self, window: &Window, run_year: i32) -> PathBuf {
        self.table_dir.join(window.table_name(self.naming, run_year))
    }

    /// Write the raw records as indented JSON
    pub fn write_snapshot(&self, window: &Window, records: &[Record]) -> Result<PathBuf> {
        let name = window.snapshot_name(self.naming);
        let temp_path = self.temp_dir.join(&name);
        let final_path = self.snapshot_dir.join(&name);

        let mut writer = BufWriter::new(File::create(&temp_path)?);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(writer);

        move_into_place(&temp_path, &final_path)?;

        tracing::info!(
            path = %final_path.display(),
            records = records.len(),
            "Snapshot written"
        );
        Ok(final_path)
    }

    /// Write the flattened table, one physical row per flattened row
    ///
    /// Returns `None` without touching the filesystem when there are no
    /// records.
    pub fn write_table(
        &self,
        window: &Window,
        records: &[Record],
        flattener: &RowFlattener,
        run_year: i32,
    ) -> Result<Option<TableReport>> {
        let name = window.table_name(self.naming, run_year);
        if records.is_empty() {
            tracing::info!(file = %name, "No data for this window, skipping CSV");
            return Ok(None);
        }

        let temp_path = self.temp_dir.join(&name);
        let final_path = self.table_dir.join(&name);

        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .from_path(&temp_path)?;
        writer.write_record(flattener.schema().columns())?;

        let mut rows = 0;
        for record in records {
            for row in flattener.rows(record) {
                writer.write_record(row.values())?;
                rows += 1;
            }
        }
        writer.flush()?;
        drop(writer);

        move_into_place(&temp_path, &final_path)?;

        tracing::info!(path = %final_path.display(), rows, "CSV report generated");
        Ok(Some(TableReport {
            path: final_path,
            rows,
        }))
    }
}

/// Suffix of the staging copy made next to the final file
const PARTIAL_SUFFIX: &str = "partial";

/// Rename into place, falling back to a copy when the rename fails
fn move_into_place(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    copy_into_place(from, to)
}

/// Copy to `<to>.partial` beside the final file, then rename that into place
///
/// The final name only ever appears through a same-directory rename, so an
/// interrupted copy leaves a `.partial` file that the snapshot scan ignores.
fn copy_into_place(from: &Path, to: &Path) -> Result<()> {
    let staging = partial_path(to);
    let moved = fs::copy(from, &staging)
        .and_then(|_| File::open(&staging)?.sync_all())
        .and_then(|_| fs::rename(&staging, to));

    if let Err(e) = moved {
        let _ = fs::remove_file(&staging);
        return Err(InventoryError::Report(format!(
            "Failed to move {} to {}: {e}",
            from.display(),
            to.display()
        )));
    }
    fs::remove_file(from)?;
    Ok(())
}

fn partial_path(to: &Path) -> PathBuf {
    let mut name = to.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(PARTIAL_SUFFIX);
    to.with_file_name(name)
}
