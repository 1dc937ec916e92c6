#![warn(missing_docs)]
//! # Patbench
//!
//! Parallel algorithmic patterns behind one execution policy, and the
//! benchmark kernels built on them.
//!
//! - **Execution policies**: sequential, native thread pool, static
//!   data-parallel and work-stealing task-parallel backends, selected by name
//! - **Patterns**: reduction, indexed and stencil maps, divide-and-conquer,
//!   sliding-window streams
//! - **Kernels**: blur, dgemv, mandelbrot, mergesort, sensor
//! - **Reporting**: repeated-run timing summaries as text, JSON or CSV
//!
//! ## Quick Start
//!
//! ```ignore
//! use patbench::prelude::*;
//!
//! let policy = resolve("tbb", 4)?;
//! let total = reduce(&[1i64, 2, 3, 4], 0, |a, b| a + b, &policy);
//! let sorted = merge_sort(&[5, 3, 1, 4], &policy);
//! ```
//!
//! ## Divide and Conquer
//!
//! ```ignore
//! struct Sum;
//! impl DivideConquer for Sum { /* is_base, solve, divide, combine */ }
//! let total = divide_and_conquer(&Sum, problem, &policy);
//! ```

// Re-export core types
pub use patbench_core::{
    Backend, CancelToken, DivideConquer, Elapsed, ExecutionPolicy, KernelTable, PatternError,
    Sample, Span, Stopwatch, StreamStats, StreamWindow, WindowConfig, available_cores,
    divide_and_conquer, dot, map_indexed, map_reduce, map_stencil, merge, merge_sort,
    merge_sort_by, merge_sort_by_key, reduce, resolve,
};

// Re-export kernels
pub use patbench_kernels::{
    BmpImage, DataGen, FormatError, MandelbrotParams, Matrix, Rgb, Sensor, blur, dgemv, io,
    mandelbrot, mergesort, sensor,
};

// Re-export stats and reports
pub use patbench_report::{OutputFormat, Report, generate_csv_report, generate_json_report};
pub use patbench_stats::TimingSummary;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Backend, CancelToken, DivideConquer, ExecutionPolicy, KernelTable, PatternError, Span,
        StreamWindow, WindowConfig, divide_and_conquer, map_indexed, map_reduce, map_stencil,
        merge_sort, reduce, resolve,
    };
}

/// Run the patbench command line; returns the process exit code.
pub use patbench_cli::run;
