//! Kernel Executor
//!
//! Runs one kernel invocation and collects its timings.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Command (parsed by clap)
//!       │
//!       ▼
//! ┌─────────────┐
//! │   kernels   │  Prepare inputs, build the timed body
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │  execution  │  Warmup, timed repeats
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │  metadata   │  Host description for the report
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```

mod execution;
mod formatting;
mod kernels;
mod metadata;

pub use execution::{RunPlan, Runner};
pub use formatting::format_human_output;
pub use kernels::{KernelOutcome, execute};
pub use metadata::{build_report_meta, system_info};
