//! Run log persistence.
//!
//! Every benchmark run writes two artifacts: a tabular summary
//! (`leaderboard.csv`, overwritten each run) and a structured trace (an
//! array of result rows in a file named after the run's start time, never
//! overwritten).

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::runner::run_log::ResultRow;
use crate::utilities::errors::BenchmarkError;

/// File name of the tabular summary inside the output directory.
pub const SUMMARY_FILE: &str = "leaderboard.csv";

const SUMMARY_HEADER: &str =
    "task_id,task_name,agent,passed,quality_score,duration_seconds,fail_reasons,error";

/// Trace file name for a run that started at `started_at`.
pub fn trace_filename(started_at: DateTime<Utc>) -> String {
    format!("trace_{}.json", started_at.format("%Y%m%dT%H%M%S%3fZ"))
}

/// Write the tabular summary, one row per (task, agent) pair.
///
/// Durations are rounded to two decimals here; the trace keeps full
/// precision.
pub fn write_summary_csv(path: &Path, rows: &[ResultRow]) -> Result<(), BenchmarkError> {
    let mut out = String::from(SUMMARY_HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{:.2},{},{}\n",
            csv_field(&row.task_id),
            csv_field(&row.task_name),
            csv_field(&row.agent),
            row.passed,
            row.quality_score,
            row.duration_seconds,
            csv_field(&row.fail_reasons),
            row.error,
        ));
    }
    fs::write(path, out)?;
    Ok(())
}

/// Write the structured trace: the run log as a JSON array of rows.
pub fn write_trace(path: &Path, rows: &[ResultRow]) -> Result<(), BenchmarkError> {
    let content = serde_json::to_string_pretty(rows)?;
    fs::write(path, content)?;
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
