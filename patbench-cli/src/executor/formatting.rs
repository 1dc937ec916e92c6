//! Output Formatting
//!
//! Human-readable rendering of a run report: configuration, per-run
//! timings and, when more than one run was timed, the summary statistics.

use patbench_report::Report;

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();
    let config = &report.config;

    output.push('\n');
    output.push_str("Patbench Results\n");
    output.push_str(&"=".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "kernel: {}  policy: {}  runs: {}  warmup: {}\n",
        config.kernel, config.policy, report.summary.runs, report.summary.warmup_runs
    ));
    if let Some(seed) = config.seed {
        output.push_str(&format!("seed: {}\n", seed));
    }
    for (key, value) in &config.parameters {
        output.push_str(&format!("  {}: {}\n", key, value));
    }
    output.push_str(&format!(
        "host: {} {} ({}, {} cores)\n",
        report.meta.system.os, report.meta.system.arch, report.meta.system.cpu,
        report.meta.system.cpu_cores
    ));
    output.push_str(&"-".repeat(60));
    output.push('\n');

    for run in &report.runs {
        output.push_str(&format!("  run {:>3}: {:.3} ms\n", run.index, run.elapsed_ms));
    }

    if let Some(timing) = report.timing.as_ref().filter(|t| t.samples > 1) {
        output.push('\n');
        output.push_str(&format!(
            "  mean: {:.3} ms  median: {:.3} ms  stddev: {:.3} ms\n",
            timing.mean, timing.median, timing.std_dev
        ));
        output.push_str(&format!(
            "  min: {:.3} ms  max: {:.3} ms  cv: {:.2}%\n",
            timing.min,
            timing.max,
            timing.coefficient_of_variation()
        ));
        output.push_str(&format!(
            "  p50: {:.3} ms  p90: {:.3} ms  p95: {:.3} ms  p99: {:.3} ms\n",
            timing.percentiles.p50,
            timing.percentiles.p90,
            timing.percentiles.p95,
            timing.percentiles.p99
        ));
        if timing.outliers.total() > 0 {
            output.push_str(&format!(
                "  outliers: {} low, {} high\n",
                timing.outliers.low, timing.outliers.high
            ));
        }
    }

    output.push_str(&format!(
        "\ntotal: {:.3} ms over {} run(s)\n",
        report.summary.total_duration_ms, report.summary.runs
    ));
    output
}
