//! Report Data Structures

use chrono::{DateTime, Utc};
use patbench_stats::TimingSummary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current layout version of serialized reports
pub const SCHEMA_VERSION: u32 = 1;

/// Complete record of one kernel invocation with its repeats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub config: RunConfig,
    pub runs: Vec<RunRecord>,
    /// Summary of `runs[*].elapsed_ms`; absent when nothing was timed
    pub timing: Option<TimingSummary>,
    pub summary: ReportSummary,
}

/// Report metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub schema_version: u32,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub system: SystemInfo,
}

/// Host the run executed on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    pub cpu: String,
    pub cpu_cores: u32,
}

/// What was run and how
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Kernel name (blur, dgemv, ...)
    pub kernel: String,
    /// Resolved execution policy, e.g. `thr(4)`
    pub policy: String,
    pub repeat: usize,
    pub warmup: usize,
    pub seed: Option<u64>,
    /// Kernel-specific parameters as given on the command line
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

/// One timed execution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Zero-based index among timed runs
    pub index: usize,
    pub elapsed_ms: f64,
}

/// Headline figures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub runs: usize,
    pub warmup_runs: usize,
    /// Wall-clock time across timed runs
    pub total_duration_ms: f64,
    /// Mean of the timed runs, truncated to whole milliseconds
    pub execution_time_ms: u64,
}

impl Report {
    /// Assemble a report and summarize its runs
    pub fn new(meta: ReportMeta, config: RunConfig, runs: Vec<RunRecord>) -> Self {
        let samples: Vec<f64> = runs.iter().map(|r| r.elapsed_ms).collect();
        let timing = TimingSummary::from_samples(&samples);
        let summary = ReportSummary {
            runs: runs.len(),
            warmup_runs: config.warmup,
            total_duration_ms: samples.iter().sum(),
            execution_time_ms: timing.as_ref().map_or(0, |t| t.mean.max(0.0) as u64),
        };
        Self {
            meta,
            config,
            runs,
            timing,
            summary,
        }
    }
}

impl ReportMeta {
    /// Metadata stamped with the current time
    pub fn now(version: impl Into<String>, system: SystemInfo) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            version: version.into(),
            timestamp: Utc::now(),
            system,
        }
    }
}
