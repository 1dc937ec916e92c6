//! Stream-Window Pattern
//!
//! A pull-based sliding window over an opaque source. Each cycle:
//!
//! 1. check the cancel token
//! 2. evict the oldest `slide` samples once the buffer holds at least that many
//! 3. refill from the source until the buffer is full or the item budget runs out
//! 4. hand the mean of the buffer to the sink
//!
//! The buffer is owned by the running stream and mutated by one thread of
//! control only. Parallel policies are accepted but the cycle itself runs
//! sequentially; averaging a bounded window is too small to split.

use crate::error::PatternError;
use crate::policy::ExecutionPolicy;
use num_traits::AsPrimitive;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Samples reserved up front; larger windows grow the buffer as they fill
const INITIAL_BUFFER_CAPACITY: usize = 4096;

/// Shared flag requesting that a stream stop at its next cycle.
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Window geometry and item budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Maximum number of samples held at once
    pub window_size: usize,
    /// Samples evicted per cycle
    pub slide: usize,
    /// Stop once more than this many samples have been pulled
    pub item_count: u64,
}

impl WindowConfig {
    /// Reject zero-sized windows and slides
    pub fn validate(&self) -> Result<(), PatternError> {
        if self.window_size == 0 || self.slide == 0 {
            return Err(PatternError::InvalidWindow {
                window_size: self.window_size,
                slide: self.slide,
            });
        }
        Ok(())
    }

    fn eviction_threshold(&self) -> usize {
        self.slide.min(self.window_size)
    }
}

/// Counters reported when a stream finishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Averages delivered to the sink
    pub windows: u64,
    /// Samples pulled from the source
    pub items_pulled: u64,
    /// Whether the stream stopped on its cancel token
    pub cancelled: bool,
}

/// A numeric sample that can be averaged
pub trait Sample: AsPrimitive<f64> {}

impl<T: AsPrimitive<f64>> Sample for T {}

/// Sliding-window mean over a pull-based source.
#[derive(Debug)]
pub struct StreamWindow {
    config: WindowConfig,
    cancel: CancelToken,
}

impl StreamWindow {
    /// Build a stream; fails on a zero window or slide
    pub fn new(config: WindowConfig, cancel: CancelToken) -> Result<Self, PatternError> {
        config.validate()?;
        Ok(Self { config, cancel })
    }

    /// Window geometry
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Token observed once per cycle
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Drive `source` through the window, delivering each mean to `sink`.
    ///
    /// Finishes when the item budget is exceeded (the final, possibly
    /// partial, window is still emitted) or when the cancel token is set.
    pub fn run<T, S, K>(&self, mut source: S, mut sink: K, policy: &ExecutionPolicy) -> StreamStats
    where
        T: Sample,
        S: FnMut() -> T,
        K: FnMut(f64),
    {
        if !policy.is_sequential() {
            tracing::debug!(policy = %policy, "stream window runs sequentially");
        }

        let WindowConfig {
            window_size,
            slide,
            item_count,
        } = self.config;
        let threshold = self.config.eviction_threshold();
        let mut buffer: VecDeque<T> =
            VecDeque::with_capacity(window_size.min(INITIAL_BUFFER_CAPACITY));
        let mut stats = StreamStats::default();
        let mut finished = false;

        while !finished {
            if self.cancel.is_cancelled() {
                tracing::info!(windows = stats.windows, "stream cancelled");
                stats.cancelled = true;
                break;
            }

            if buffer.len() >= threshold {
                let evict = slide.min(buffer.len());
                buffer.drain(..evict);
            }

            while buffer.len() < window_size {
                buffer.push_back(source());
                stats.items_pulled += 1;
                if stats.items_pulled > item_count {
                    finished = true;
                    break;
                }
            }

            sink(mean(&buffer));
            stats.windows += 1;
        }

        tracing::debug!(
            windows = stats.windows,
            items = stats.items_pulled,
            cancelled = stats.cancelled,
            "stream finished"
        );
        stats
    }
}

fn mean<T: Sample>(buffer: &VecDeque<T>) -> f64 {
    if buffer.is_empty() {
        return 0.0;
    }
    let sum: f64 = buffer.iter().map(|&s| s.as_()).sum();
    sum / buffer.len() as f64
}
