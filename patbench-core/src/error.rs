//! Pattern Errors
//!
//! Configuration failures (unknown backend, pool construction) and structural
//! contract violations (bad ranges, shapes, window parameters).

use thiserror::Error;

/// Errors raised while resolving a policy or invoking a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// Backend name matched none of the recognized values
    #[error("Unknown backend: {0} (expected one of: seq, thr, omp, tbb)")]
    UnknownBackend(String),

    /// Worker pool could not be built
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(String),

    /// Half-open range with first > last
    #[error("Invalid range: [{first}, {last})")]
    InvalidRange {
        /// First index (inclusive)
        first: usize,
        /// Last index (exclusive)
        last: usize,
    },

    /// Flat buffer does not tile into rows of the given width
    #[error("Invalid shape: {len} elements cannot be laid out in rows of width {width}")]
    InvalidShape {
        /// Buffer length
        len: usize,
        /// Row width
        width: usize,
    },

    /// Stencil kernel must have an odd, non-zero side length
    #[error("Kernel side length must be odd, got {0}")]
    EvenKernel(usize),

    /// Kernel weights too large to accumulate over an 8-bit neighborhood
    #[error("Kernel weights overflow the accumulator (side {0})")]
    KernelOverflow(usize),

    /// Window size and slide must both be at least one
    #[error("Invalid window: size {window_size}, slide {slide}")]
    InvalidWindow {
        /// Samples held per window
        window_size: usize,
        /// Samples evicted per cycle
        slide: usize,
    },
}
