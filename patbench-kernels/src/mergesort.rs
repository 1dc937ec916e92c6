//! Mergesort over a random integer sequence.

use patbench_core::{ExecutionPolicy, merge_sort};
use std::fmt::Write;

/// Sorted copy of `sequence`
pub fn sort(sequence: &[i32], policy: &ExecutionPolicy) -> Vec<i32> {
    tracing::debug!(len = sequence.len(), policy = %policy, "merge sort");
    merge_sort(sequence, policy)
}

/// Space-separated rendering used when printing sequences
pub fn format_sequence(sequence: &[i32]) -> String {
    let mut out = String::with_capacity(sequence.len() * 4);
    for v in sequence {
        let _ = write!(out, "{} ", v);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datagen::DataGen;
    use patbench_core::Backend;

    #[test]
    fn test_sort_random_sequence() {
        let data = DataGen::new(Some(11)).integers(12_345);
        let mut expected = data.clone();
        expected.sort_unstable();

        for backend in Backend::ALL {
            let policy = ExecutionPolicy::new(backend, 4).unwrap();
            assert_eq!(sort(&data, &policy), expected);
        }
    }

    #[test]
    fn test_format_sequence() {
        assert_eq!(format_sequence(&[3, 1, 2]), "3 1 2 ");
        assert_eq!(format_sequence(&[]), "");
    }
}
