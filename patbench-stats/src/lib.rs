#![warn(missing_docs)]
//! Patbench Statistics
//!
//! Summaries of repeated kernel timings:
//! - Mean, median, standard deviation, min and max
//! - Interpolated percentiles (p50, p90, p95, p99)
//! - Outlier counts via Tukey's IQR fences

mod outliers;
mod percentiles;
mod summary;

pub use outliers::{DEFAULT_IQR_K, Fence, OutlierCount, count_outliers};
pub use percentiles::{Percentiles, percentile, percentile_sorted, sorted};
pub use summary::TimingSummary;
