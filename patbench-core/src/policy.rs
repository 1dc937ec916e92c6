//! Execution Policies
//!
//! A closed set of backends selected once per run:
//!
//! - `Sequential`: inline on the calling thread
//! - `ThreadPool`: a fixed team of scoped OS threads pulling blocks from a shared queue
//! - `DataParallel`: a rayon pool sliced into `width` equal static blocks
//! - `TaskParallel`: a rayon pool with fine-grained, work-stolen blocks
//!
//! Every pattern dispatches on the variant with an explicit `match`. The
//! backend only changes scheduling granularity, never which output slot a
//! unit of work writes.

use crate::error::PatternError;
use rayon::prelude::*;
use std::fmt;
use std::num::NonZeroUsize;
use std::ops::Range;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

/// Blocks handed to each thread-pool worker (load balancing slack)
const BLOCKS_PER_WORKER: usize = 4;

/// Fine-grained blocks per task-parallel worker
const TASKS_PER_WORKER: usize = 16;

/// Lower bound on task-parallel block length
const MIN_TASK_GRAIN: usize = 256;

/// Backend kind, as named on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Single-threaded synchronous execution
    Sequential,
    /// Native worker threads consuming independent blocks
    ThreadPool,
    /// Static data-parallel slicing across a thread team
    DataParallel,
    /// Work-stealing task scheduler
    TaskParallel,
}

impl Backend {
    /// All backends in declaration order
    pub const ALL: [Backend; 4] = [
        Backend::Sequential,
        Backend::ThreadPool,
        Backend::DataParallel,
        Backend::TaskParallel,
    ];

    /// Short command-line name
    pub fn name(self) -> &'static str {
        match self {
            Backend::Sequential => "seq",
            Backend::ThreadPool => "thr",
            Backend::DataParallel => "omp",
            Backend::TaskParallel => "tbb",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "seq" | "sequential" => Ok(Backend::Sequential),
            "thr" | "thread-pool" | "threads" => Ok(Backend::ThreadPool),
            "omp" | "data-parallel" => Ok(Backend::DataParallel),
            "tbb" | "task-parallel" => Ok(Backend::TaskParallel),
            _ => Err(PatternError::UnknownBackend(s.to_string())),
        }
    }
}

/// A rayon pool shared by clones of the same policy
#[derive(Debug, Clone)]
pub struct Team {
    width: usize,
    pool: Arc<rayon::ThreadPool>,
}

impl Team {
    fn build(width: usize, backend: Backend) -> Result<Self, PatternError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(width)
            .thread_name(move |i| format!("patbench-{}-{}", backend.name(), i))
            .build()
            .map_err(|e| PatternError::ThreadPool(e.to_string()))?;
        Ok(Self {
            width,
            pool: Arc::new(pool),
        })
    }
}

/// Selected backend plus its concurrency degree.
///
/// Immutable once built; clones share the underlying pool.
#[derive(Debug, Clone)]
pub enum ExecutionPolicy {
    /// Run everything on the caller's thread
    Sequential,
    /// Scoped native threads
    ThreadPool {
        /// Number of worker threads
        width: NonZeroUsize,
    },
    /// Static slicing inside a dedicated rayon pool
    DataParallel(Team),
    /// Work stealing inside a dedicated rayon pool
    TaskParallel(Team),
}

/// Resolve a backend name and concurrency hint into a policy.
///
/// A concurrency of 0 selects every available core. The hint is ignored by
/// the sequential backend.
pub fn resolve(name: &str, concurrency: usize) -> Result<ExecutionPolicy, PatternError> {
    let backend: Backend = name.parse()?;
    ExecutionPolicy::new(backend, concurrency)
}

/// Number of hardware threads, or 1 when it cannot be determined
pub fn available_cores() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl ExecutionPolicy {
    /// Build a policy for `backend` with `concurrency` workers (0 = all cores)
    pub fn new(backend: Backend, concurrency: usize) -> Result<Self, PatternError> {
        let width = NonZeroUsize::new(concurrency)
            .or_else(|| std::thread::available_parallelism().ok())
            .unwrap_or(NonZeroUsize::MIN);

        let policy = match backend {
            Backend::Sequential => ExecutionPolicy::Sequential,
            Backend::ThreadPool => ExecutionPolicy::ThreadPool { width },
            Backend::DataParallel => {
                ExecutionPolicy::DataParallel(Team::build(width.get(), backend)?)
            }
            Backend::TaskParallel => {
                ExecutionPolicy::TaskParallel(Team::build(width.get(), backend)?)
            }
        };
        tracing::debug!(policy = %policy, "resolved execution policy");
        Ok(policy)
    }

    /// The sequential policy
    pub fn sequential() -> Self {
        ExecutionPolicy::Sequential
    }

    /// Backend kind of this policy
    pub fn backend(&self) -> Backend {
        match self {
            ExecutionPolicy::Sequential => Backend::Sequential,
            ExecutionPolicy::ThreadPool { .. } => Backend::ThreadPool,
            ExecutionPolicy::DataParallel(_) => Backend::DataParallel,
            ExecutionPolicy::TaskParallel(_) => Backend::TaskParallel,
        }
    }

    /// Concurrency degree (1 for sequential)
    pub fn width(&self) -> usize {
        match self {
            ExecutionPolicy::Sequential => 1,
            ExecutionPolicy::ThreadPool { width } => width.get(),
            ExecutionPolicy::DataParallel(team) | ExecutionPolicy::TaskParallel(team) => {
                team.width
            }
        }
    }

    /// Whether work runs on the caller's thread only
    pub fn is_sequential(&self) -> bool {
        matches!(self, ExecutionPolicy::Sequential)
    }

    /// Block length used when slicing `len` output slots under this policy
    pub fn block_len(&self, len: usize) -> usize {
        let len = len.max(1);
        match self {
            ExecutionPolicy::Sequential => len,
            ExecutionPolicy::ThreadPool { width } => {
                len.div_ceil(width.get() * BLOCKS_PER_WORKER).max(1)
            }
            ExecutionPolicy::DataParallel(team) => len.div_ceil(team.width).max(1),
            ExecutionPolicy::TaskParallel(team) => len
                .div_ceil(team.width * TASKS_PER_WORKER)
                .max(MIN_TASK_GRAIN)
                .min(len),
        }
    }

    /// Apply `f` to contiguous, non-overlapping blocks of `out`.
    ///
    /// `f` receives the offset of the block within `out` and the block itself.
    /// Blocks never overlap, so no synchronization is needed on the output.
    pub fn for_each_block<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync,
    {
        if out.is_empty() {
            return;
        }
        let block_len = self.block_len(out.len());
        if block_len >= out.len() {
            return f(0, out);
        }

        match self {
            ExecutionPolicy::Sequential => f(0, out),
            ExecutionPolicy::ThreadPool { width } => {
                let blocks: Vec<(usize, &mut [T])> = out
                    .chunks_mut(block_len)
                    .enumerate()
                    .map(|(i, block)| (i * block_len, block))
                    .collect();
                let workers = width.get().min(blocks.len());
                if workers <= 1 {
                    for (offset, block) in blocks {
                        f(offset, block);
                    }
                    return;
                }
                let queue = Mutex::new(blocks.into_iter());

                std::thread::scope(|s| {
                    for _ in 0..workers {
                        s.spawn(|| {
                            loop {
                                let next = queue
                                    .lock()
                                    .unwrap_or_else(PoisonError::into_inner)
                                    .next();
                                match next {
                                    Some((offset, block)) => f(offset, block),
                                    None => break,
                                }
                            }
                        });
                    }
                });
            }
            ExecutionPolicy::DataParallel(team) | ExecutionPolicy::TaskParallel(team) => {
                team.pool.install(|| {
                    out.par_chunks_mut(block_len)
                        .enumerate()
                        .for_each(|(i, block)| f(i * block_len, block));
                });
            }
        }
    }

    /// Evaluate `f` over consecutive index ranges of length `block_len`
    /// covering `0..len`, returning the results in range order.
    ///
    /// The partition depends only on `len` and `block_len`, never on the
    /// backend or its width.
    pub fn map_blocks<R, F>(&self, len: usize, block_len: usize, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(Range<usize>) -> R + Sync,
    {
        let block_len = block_len.max(1);
        let count = len.div_ceil(block_len);
        let range_of = |i: usize| (i * block_len)..((i + 1) * block_len).min(len);

        if self.is_sequential() {
            return (0..count).map(|i| f(range_of(i))).collect();
        }

        let mut slots: Vec<Option<R>> = (0..count).map(|_| None).collect();
        self.for_each_block(&mut slots, |offset, block| {
            for (j, slot) in block.iter_mut().enumerate() {
                *slot = Some(f(range_of(offset + j)));
            }
        });
        slots.into_iter().flatten().collect()
    }

    /// Run two closures, potentially in parallel, and wait for both.
    ///
    /// This is the only blocking point of a parallel split.
    pub fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        match self {
            ExecutionPolicy::Sequential => {
                let ra = a();
                (ra, b())
            }
            ExecutionPolicy::ThreadPool { .. } => std::thread::scope(|s| {
                let handle = s.spawn(b);
                let ra = a();
                match handle.join() {
                    Ok(rb) => (ra, rb),
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }),
            ExecutionPolicy::DataParallel(team) | ExecutionPolicy::TaskParallel(team) => {
                team.pool.install(|| rayon::join(a, b))
            }
        }
    }
}

impl fmt::Display for ExecutionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionPolicy::Sequential => f.write_str("seq"),
            other => write!(f, "{}({})", other.backend(), other.width()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_policies(width: usize) -> Vec<ExecutionPolicy> {
        Backend::ALL
            .iter()
            .map(|b| ExecutionPolicy::new(*b, width).unwrap())
            .collect()
    }

    #[test]
    fn test_resolve_known_names() {
        assert_eq!(resolve("seq", 4).unwrap().backend(), Backend::Sequential);
        assert_eq!(resolve("thr", 4).unwrap().backend(), Backend::ThreadPool);
        assert_eq!(resolve("omp", 2).unwrap().backend(), Backend::DataParallel);
        assert_eq!(resolve("TBB", 2).unwrap().backend(), Backend::TaskParallel);
        assert_eq!(
            resolve("task-parallel", 2).unwrap().backend(),
            Backend::TaskParallel
        );
    }

    #[test]
    fn test_resolve_unknown_backend() {
        let err = resolve("cuda", 4).unwrap_err();
        assert_eq!(err, PatternError::UnknownBackend("cuda".to_string()));
    }

    #[test]
    fn test_width() {
        assert_eq!(resolve("seq", 8).unwrap().width(), 1);
        assert_eq!(resolve("thr", 3).unwrap().width(), 3);
        assert!(resolve("omp", 0).unwrap().width() >= 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(resolve("seq", 8).unwrap().to_string(), "seq");
        assert_eq!(resolve("thr", 3).unwrap().to_string(), "thr(3)");
    }

    #[test]
    fn test_for_each_block_covers_every_slot_once() {
        for policy in all_policies(3) {
            let mut out = vec![0usize; 1001];
            policy.for_each_block(&mut out, |offset, block| {
                for (j, slot) in block.iter_mut().enumerate() {
                    *slot += offset + j + 1;
                }
            });
            let expected: Vec<usize> = (1..=1001).collect();
            assert_eq!(out, expected, "policy {}", policy);
        }
    }

    #[test]
    fn test_for_each_block_empty() {
        for policy in all_policies(2) {
            let mut out: Vec<u8> = Vec::new();
            policy.for_each_block(&mut out, |_, _| panic!("no blocks expected"));
        }
    }

    #[test]
    fn test_map_blocks_order() {
        for policy in all_policies(4) {
            let starts = policy.map_blocks(10, 3, |r| (r.start, r.end));
            assert_eq!(starts, vec![(0, 3), (3, 6), (6, 9), (9, 10)]);
        }
    }

    #[test]
    fn test_join_returns_both() {
        for policy in all_policies(2) {
            let (a, b) = policy.join(|| 1 + 1, || "two");
            assert_eq!(a, 2);
            assert_eq!(b, "two");
        }
    }

    #[test]
    fn test_zero_concurrency_never_yields_zero_width() {
        for backend in Backend::ALL {
            let policy = ExecutionPolicy::new(backend, 0).unwrap();
            assert!(policy.width() >= 1);
            assert!(policy.block_len(100) >= 1);
        }
        assert!(NonZeroUsize::new(0).is_none());
    }

    #[test]
    fn test_single_block_runs_on_caller() {
        let caller = std::thread::current().id();
        for policy in all_policies(4) {
            let mut out = vec![0u8; 1];
            policy.for_each_block(&mut out, |offset, block| {
                assert_eq!(std::thread::current().id(), caller, "policy {}", policy);
                block[0] = offset as u8 + 1;
            });
            assert_eq!(out, vec![1]);
        }
        let single = ExecutionPolicy::new(Backend::ThreadPool, 1).unwrap();
        let mut out = vec![0u32; 64];
        single.for_each_block(&mut out, |offset, block| {
            assert_eq!(std::thread::current().id(), caller);
            for (j, slot) in block.iter_mut().enumerate() {
                *slot = (offset + j) as u32;
            }
        });
        assert!(out.iter().enumerate().all(|(i, &v)| v == i as u32));
    }

    #[test]
    fn test_block_len_bounds() {
        for policy in all_policies(4) {
            let len = policy.block_len(10_000);
            assert!(len >= 1 && len <= 10_000);
        }
        assert_eq!(ExecutionPolicy::sequential().block_len(7), 7);
    }
}
