//! CSV Output
//!
//! One row per timed run, spreadsheet friendly.

use crate::report::Report;
use std::fmt::Write;

/// Column header of [`generate_csv_report`]
pub const CSV_HEADER: &str = "kernel,policy,run,elapsed_ms";

/// Render every timed run as a CSV row
pub fn generate_csv_report(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push('\n');
    for run in &report.runs {
        let _ = writeln!(
            out,
            "{},{},{},{:.3}",
            escape(&report.config.kernel),
            escape(&report.config.policy),
            run.index,
            run.elapsed_ms
        );
    }
    out
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
