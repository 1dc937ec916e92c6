//! Divide-and-Conquer Pattern
//!
//! A problem is either solved directly (base case) or split in two, both
//! halves solved recursively and their solutions combined.
//!
//! ```text
//!   Unsplit ──is_base──▶ Solved
//!      │
//!    divide
//!      ▼
//!    Split ──(left ∥ right)──▶ join ──combine──▶ Merged
//! ```
//!
//! Under parallel policies the two halves may run concurrently. A
//! [`TaskGate`] holding `width - 1` permits bounds the number of extra
//! branches alive at once; a split that finds no free permit recurses
//! in-thread. The join after a split is the only blocking point.

use crate::gate::TaskGate;
use crate::policy::ExecutionPolicy;
use crate::span::Span;
use std::cmp::Ordering;

/// Spans at or below this size are never forked
pub const SEQUENTIAL_CUTOFF: usize = 2048;

/// An algorithm expressed as divide / solve / combine steps.
pub trait DivideConquer: Sync {
    /// Unit of work
    type Problem: Send;
    /// Result of solving a unit of work
    type Solution: Send;

    /// Whether `problem` is solved directly
    fn is_base(&self, problem: &Self::Problem) -> bool;

    /// Solve a base problem
    fn solve(&self, problem: Self::Problem) -> Self::Solution;

    /// Split a non-base problem into two independent halves
    fn divide(&self, problem: Self::Problem) -> (Self::Problem, Self::Problem);

    /// Merge the solutions of the two halves (left first)
    fn combine(&self, left: Self::Solution, right: Self::Solution) -> Self::Solution;

    /// Whether splitting `problem` is worth a concurrent branch
    fn should_fork(&self, _problem: &Self::Problem) -> bool {
        true
    }
}

/// Run `algo` on `problem` under `policy`.
pub fn divide_and_conquer<D>(algo: &D, problem: D::Problem, policy: &ExecutionPolicy) -> D::Solution
where
    D: DivideConquer,
{
    let gate = TaskGate::new(policy.width().saturating_sub(1));
    tracing::debug!(
        policy = %policy,
        permits = gate.capacity(),
        "divide-and-conquer started"
    );
    recurse(algo, problem, policy, &gate)
}

fn recurse<D>(algo: &D, problem: D::Problem, policy: &ExecutionPolicy, gate: &TaskGate) -> D::Solution
where
    D: DivideConquer,
{
    if algo.is_base(&problem) {
        return algo.solve(problem);
    }

    let permit = if algo.should_fork(&problem) {
        gate.try_acquire()
    } else {
        None
    };
    let (left, right) = algo.divide(problem);

    let (left, right) = match permit {
        Some(_permit) => policy.join(
            || recurse(algo, left, policy, gate),
            || recurse(algo, right, policy, gate),
        ),
        None => {
            let left = recurse(algo, left, policy, gate);
            (left, recurse(algo, right, policy, gate))
        }
    };
    algo.combine(left, right)
}

/// Two-pointer merge of two sorted runs.
///
/// At each step the smaller head is emitted; on ties the left head wins, so
/// equal keys keep their relative order. Once one run is exhausted the rest
/// of the other is appended unchanged.
pub fn merge_by<T, F>(left: Vec<T>, right: Vec<T>, compare: F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    let mut out = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        let next = if compare(r, l) == Ordering::Less {
            right.next()
        } else {
            left.next()
        };
        out.extend(next);
    }
    out.extend(left);
    out.extend(right);
    out
}

/// Merge two runs sorted in natural order
pub fn merge<T: Ord>(left: Vec<T>, right: Vec<T>) -> Vec<T> {
    merge_by(left, right, T::cmp)
}

/// Merge sort as a divide-and-conquer over index spans of a borrowed slice
struct MergeSort<'a, T, F> {
    seq: &'a [T],
    compare: F,
}

impl<T, F> DivideConquer for MergeSort<'_, T, F>
where
    T: Clone + Send + Sync,
    F: Fn(&T, &T) -> Ordering + Sync,
{
    type Problem = Span;
    type Solution = Vec<T>;

    fn is_base(&self, span: &Span) -> bool {
        span.size() <= 1
    }

    fn solve(&self, span: Span) -> Vec<T> {
        span.slice(self.seq).to_vec()
    }

    fn divide(&self, span: Span) -> (Span, Span) {
        span.split()
    }

    fn combine(&self, left: Vec<T>, right: Vec<T>) -> Vec<T> {
        merge_by(left, right, &self.compare)
    }

    fn should_fork(&self, span: &Span) -> bool {
        span.size() > SEQUENTIAL_CUTOFF
    }
}

/// Stable sort of `seq` by `compare`; returns a new vector
pub fn merge_sort_by<T, F>(seq: &[T], compare: F, policy: &ExecutionPolicy) -> Vec<T>
where
    T: Clone + Send + Sync,
    F: Fn(&T, &T) -> Ordering + Sync,
{
    let algo = MergeSort { seq, compare };
    divide_and_conquer(&algo, Span::full(seq.len()), policy)
}

/// Stable sort of `seq` by the key extracted with `key`
pub fn merge_sort_by_key<T, K, F>(seq: &[T], key: F, policy: &ExecutionPolicy) -> Vec<T>
where
    T: Clone + Send + Sync,
    K: Ord,
    F: Fn(&T) -> K + Sync,
{
    merge_sort_by(seq, |a, b| key(a).cmp(&key(b)), policy)
}

/// Stable sort of `seq` in natural order
pub fn merge_sort<T>(seq: &[T], policy: &ExecutionPolicy) -> Vec<T>
where
    T: Ord + Clone + Send + Sync,
{
    merge_sort_by(seq, T::cmp, policy)
}
