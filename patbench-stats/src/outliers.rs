//! Outlier Detection
//!
//! Tukey fences: samples outside `[Q1 - k*IQR, Q3 + k*IQR]` are counted as
//! outliers. They are reported, never removed.

use crate::percentiles::percentile_sorted;
use serde::{Deserialize, Serialize};

/// Standard fence multiplier
pub const DEFAULT_IQR_K: f64 = 1.5;

/// Inclusive bounds of the non-outlier region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fence {
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
}

impl Fence {
    /// Tukey fence of an ascending slice
    pub fn iqr(sorted: &[f64], k: f64) -> Self {
        let q1 = percentile_sorted(sorted, 25.0);
        let q3 = percentile_sorted(sorted, 75.0);
        let iqr = q3 - q1;
        Self {
            lower: q1 - k * iqr,
            upper: q3 + k * iqr,
        }
    }
}

/// Outliers on each side of the fence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutlierCount {
    /// Below the lower fence
    pub low: usize,
    /// Above the upper fence
    pub high: usize,
}

impl OutlierCount {
    /// Both sides together
    pub fn total(&self) -> usize {
        self.low + self.high
    }
}

/// Count samples outside the IQR fence of an ascending slice
pub fn count_outliers(sorted: &[f64], k: f64) -> OutlierCount {
    if sorted.len() < 4 {
        return OutlierCount::default();
    }
    let fence = Fence::iqr(sorted, k);
    sorted
        .iter()
        .fold(OutlierCount::default(), |mut count, &x| {
            if x < fence.lower {
                count.low += 1;
            } else if x > fence.upper {
                count.high += 1;
            }
            count
        })
}
