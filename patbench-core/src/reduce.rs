//! Reduction Pattern
//!
//! Folds a sequence into a single value with an associative operator.
//!
//! Parallel policies cut the input into fixed blocks of [`REDUCE_BLOCK`]
//! elements, fold each block locally starting from the identity, then fold
//! the partials left to right in block order. The block size does not depend
//! on the backend or its width, so every parallel policy produces the same
//! bits for floating-point sums. The sequential policy is a plain left fold.

use crate::policy::ExecutionPolicy;
use std::ops::Range;

/// Elements per reduction block under parallel policies
pub const REDUCE_BLOCK: usize = 4096;

/// Reduce `seq` with `combine`, starting from `identity`.
///
/// An empty sequence yields `identity`.
pub fn reduce<T, F>(seq: &[T], identity: T, combine: F, policy: &ExecutionPolicy) -> T
where
    T: Clone + Send + Sync,
    F: Fn(T, T) -> T + Sync,
{
    map_reduce(seq, identity, T::clone, combine, policy)
}

/// Map every element with `map`, then reduce the mapped values with `combine`.
pub fn map_reduce<T, U, M, F>(
    seq: &[T],
    identity: U,
    map: M,
    combine: F,
    policy: &ExecutionPolicy,
) -> U
where
    T: Sync,
    U: Clone + Send + Sync,
    M: Fn(&T) -> U + Sync,
    F: Fn(U, U) -> U + Sync,
{
    if policy.is_sequential() {
        return seq.iter().fold(identity, |acc, x| combine(acc, map(x)));
    }

    let partials = policy.map_blocks(seq.len(), REDUCE_BLOCK, |range| {
        seq[range]
            .iter()
            .fold(identity.clone(), |acc, x| combine(acc, map(x)))
    });
    tracing::trace!(blocks = partials.len(), "combining partial reductions");

    partials.into_iter().fold(identity, &combine)
}

/// Dot product `a · b` over the shorter of the two slices.
///
/// Uses the same block partition as [`map_reduce`].
pub fn dot(a: &[f64], b: &[f64], policy: &ExecutionPolicy) -> f64 {
    let n = a.len().min(b.len());
    let (a, b) = (&a[..n], &b[..n]);
    let block = |range: Range<usize>| {
        a[range.clone()]
            .iter()
            .zip(&b[range])
            .fold(0.0, |acc, (x, y)| acc + x * y)
    };

    if policy.is_sequential() {
        return block(0..n);
    }
    policy
        .map_blocks(n, REDUCE_BLOCK, block)
        .into_iter()
        .fold(0.0, |acc, partial| acc + partial)
}
