//! Summary Statistics
//!
//! One summary per timing series. Every statistic is taken over all samples;
//! outliers are counted alongside rather than filtered out, since repeat
//! counts here are small and a slow run is worth seeing.

use crate::outliers::{DEFAULT_IQR_K, OutlierCount, count_outliers};
use crate::percentiles::{Percentiles, percentile_sorted, sorted};
use serde::{Deserialize, Serialize};

/// Summary of repeated measurements (units are the caller's)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingSummary {
    /// Number of samples
    pub samples: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Median
    pub median: f64,
    /// Sample standard deviation (0 for fewer than two samples)
    pub std_dev: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Tail percentiles
    pub percentiles: Percentiles,
    /// Samples outside the 1.5 IQR fence
    pub outliers: OutlierCount,
}

impl TimingSummary {
    /// Summarize `samples`; `None` when there are none
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let sorted = sorted(samples);
        let (&min, &max) = (sorted.first()?, sorted.last()?);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std_dev = if n < 2 {
            0.0
        } else {
            let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            variance.sqrt()
        };

        Some(Self {
            samples: n,
            mean,
            median: percentile_sorted(&sorted, 50.0),
            std_dev,
            min,
            max,
            percentiles: Percentiles::from_sorted(&sorted),
            outliers: count_outliers(&sorted, DEFAULT_IQR_K),
        })
    }

    /// Relative standard deviation in percent
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            self.std_dev / self.mean * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert!(TimingSummary::from_samples(&[]).is_none());
    }

    #[test]
    fn test_single_sample() {
        let s = TimingSummary::from_samples(&[12.0]).unwrap();
        assert_eq!(s.samples, 1);
        assert_eq!((s.mean, s.median, s.min, s.max), (12.0, 12.0, 12.0, 12.0));
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.outliers.total(), 0);
    }

    #[test]
    fn test_basic_statistics() {
        let s = TimingSummary::from_samples(&[4.0, 2.0, 8.0, 6.0]).unwrap();
        assert!((s.mean - 5.0).abs() < f64::EPSILON);
        assert!((s.median - 5.0).abs() < f64::EPSILON);
        assert_eq!((s.min, s.max), (2.0, 8.0));
        // variance = (9 + 1 + 1 + 9) / 3
        assert!((s.std_dev - (20.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!(s.coefficient_of_variation() > 0.0);
    }

    #[test]
    fn test_outlier_counted_not_dropped() {
        let mut samples = vec![10.0; 12];
        samples.push(500.0);
        let s = TimingSummary::from_samples(&samples).unwrap();
        assert_eq!(s.outliers.high, 1);
        assert_eq!(s.max, 500.0);
        assert!(s.mean > 10.0);
    }
}
