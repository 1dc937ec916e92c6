//! Repeated Execution
//!
//! A [`Runner`] drives one kernel body through its warmup and timed runs.
//! Preparation (input loading, data generation) happens before the runner is
//! invoked and finalization (writing outputs) after it returns, so only the
//! computational phase is measured.
//!
//! ```text
//!   prepare ──▶ warmup × N ──▶ timed × M ──▶ finalize
//!                (untimed)     (Stopwatch)
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use patbench_core::{CancelToken, Stopwatch};
use patbench_report::RunRecord;

/// Repetition counts for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPlan {
    /// Timed runs (at least one is always performed)
    pub repeat: usize,
    /// Untimed runs before measuring
    pub warmup: usize,
}

impl Default for RunPlan {
    fn default() -> Self {
        Self {
            repeat: 1,
            warmup: 0,
        }
    }
}

/// Executes a kernel body according to a [`RunPlan`]
pub struct Runner {
    plan: RunPlan,
    cancel: Option<CancelToken>,
    show_progress: bool,
}

impl Runner {
    /// Runner for `plan`; a repeat of 0 is raised to 1
    pub fn new(plan: RunPlan) -> Self {
        Self {
            plan: RunPlan {
                repeat: plan.repeat.max(1),
                ..plan
            },
            cancel: None,
            show_progress: plan.repeat > 1,
        }
    }

    /// Stop scheduling further runs once `token` is cancelled
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Enable or disable the progress bar (on by default for repeat > 1)
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Effective repetition counts
    pub fn plan(&self) -> RunPlan {
        self.plan
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Run `body` through warmup and timed runs, returning one record per timed run.
    ///
    /// The first error aborts the remaining runs.
    pub fn run<F>(&self, kernel: &str, mut body: F) -> anyhow::Result<Vec<RunRecord>>
    where
        F: FnMut() -> anyhow::Result<()>,
    {
        for i in 0..self.plan.warmup {
            if self.cancelled() {
                break;
            }
            tracing::debug!(kernel, run = i, "warmup");
            body()?;
        }

        let pb = if self.show_progress {
            let pb = ProgressBar::new(self.plan.repeat as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb.set_message(kernel.to_string());
            Some(pb)
        } else {
            None
        };

        let mut records = Vec::with_capacity(self.plan.repeat);
        for index in 0..self.plan.repeat {
            if index > 0 && self.cancelled() {
                tracing::info!(kernel, completed = index, "interrupted, skipping remaining runs");
                break;
            }
            let watch = Stopwatch::start();
            body()?;
            let elapsed = watch.elapsed();
            tracing::debug!(kernel, run = index, elapsed = %elapsed, "timed run");
            records.push(RunRecord {
                index,
                elapsed_ms: elapsed.as_millis_f64(),
            });
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }

        if let Some(pb) = pb {
            pb.finish_with_message("Complete");
        }
        Ok(records)
    }
}
