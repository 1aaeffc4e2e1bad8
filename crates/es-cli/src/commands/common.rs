//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use es_core::{ImportMode, JobKind, JobOutcome, JobSummary, SyncResult};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Exit code when any entity in a job failed
pub(crate) const EXIT_ENTITY_FAILED: u8 = 4;

/// Exit code for validation errors and declined confirmations
pub(crate) const EXIT_VALIDATION: u8 = 1;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` so that destructors run and the
/// code is handed back from `main`.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) u8);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; nothing should reach stderr
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Results file written after every import or delete job
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SyncReport<'a> {
    pub timestamp: DateTime<Utc>,
    pub elapsed_secs: f64,
    pub kind: JobKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_mode: Option<ImportMode>,
    pub dry_run: bool,
    pub success_count: usize,
    pub failure_count: usize,
    pub outcome: JobOutcome,
    pub results: &'a [SyncResult],
}

impl<'a> SyncReport<'a> {
    pub(crate) fn new(
        kind: JobKind,
        import_mode: Option<ImportMode>,
        dry_run: bool,
        elapsed_secs: f64,
        results: &'a [SyncResult],
    ) -> Self {
        let summary = JobSummary::from_results(results);
        Self {
            timestamp: Utc::now(),
            elapsed_secs,
            kind,
            import_mode,
            dry_run,
            success_count: summary.success_count,
            failure_count: summary.error_count,
            outcome: summary.outcome(),
            results,
        }
    }
}

/// Serialize `data` as pretty-printed JSON and write it to `path`.
///
/// Creates any missing parent directories before writing.
pub(crate) fn write_json_results<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create target directory")?;
    }
    let json = serde_json::to_string_pretty(data).context("Failed to serialize results")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Calculate column widths for a table given headers and row data.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }
    widths
}

/// Print a formatted table to stdout.
///
/// Columns are left-aligned and separated by two spaces, with a dashed
/// separator under the header row.
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let widths = calculate_column_widths(headers, rows);

    let header_parts: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{:<width$}", h, width = w))
        .collect();
    println!("{}", header_parts.join("  ").trim_end());

    let sep_parts: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep_parts.join("  "));

    for row in rows {
        let row_parts: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect();
        println!("{}", row_parts.join("  ").trim_end());
    }
}
