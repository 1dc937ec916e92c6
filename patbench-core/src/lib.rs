#![warn(missing_docs)]
//! Patbench Core - Execution Policies and Patterns
//!
//! This crate provides the parallel algorithmic patterns every kernel is
//! written against, decoupled from the backend that schedules them:
//! - `ExecutionPolicy`: sequential, thread-pool, data-parallel or task-parallel
//! - Reduction with a width-independent partition
//! - Elementwise map, including a normalized 2-D stencil
//! - Divide-and-conquer with bounded fan-out, and merge sort on top of it
//! - A cancellable sliding-window stream

mod divide;
mod error;
mod gate;
mod map;
mod measure;
mod policy;
mod reduce;
mod span;
mod stream;

pub use divide::{
    DivideConquer, SEQUENTIAL_CUTOFF, divide_and_conquer, merge, merge_by, merge_sort,
    merge_sort_by, merge_sort_by_key,
};
pub use error::PatternError;
pub use gate::{Permit, TaskGate};
pub use map::{KernelTable, map_indexed, map_stencil};
pub use measure::{Elapsed, Stopwatch, time};
pub use policy::{Backend, ExecutionPolicy, Team, available_cores, resolve};
pub use reduce::{REDUCE_BLOCK, dot, map_reduce, reduce};
pub use span::Span;
pub use stream::{CancelToken, Sample, StreamStats, StreamWindow, WindowConfig};
