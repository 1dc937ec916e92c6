//! Map Pattern
//!
//! Elementwise maps producing a freshly allocated output of the same length
//! as the input range. Parallel policies split the output into contiguous,
//! disjoint blocks; each output slot is written by exactly one block.
//!
//! Two flavors:
//! - [`map_indexed`]: pure function of the output index
//! - [`map_stencil`]: weighted neighborhood of an 8-bit plane

use crate::error::PatternError;
use crate::policy::ExecutionPolicy;

/// Generate `len` values with `f(index)`.
pub fn map_indexed<T, F>(len: usize, f: F, policy: &ExecutionPolicy) -> Vec<T>
where
    T: Clone + Default + Send,
    F: Fn(usize) -> T + Sync,
{
    let mut out = vec![T::default(); len];
    policy.for_each_block(&mut out, |offset, block| {
        for (j, slot) in block.iter_mut().enumerate() {
            *slot = f(offset + j);
        }
    });
    out
}

/// Square convolution kernel of odd side length.
///
/// Built as the cross product of a 1-D kernel with itself, so
/// `len() == side() * side()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelTable {
    side: usize,
    weights: Vec<i64>,
}

/// One precomputed kernel tap: flat offset and weight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tap {
    offset: isize,
    weight: i64,
}

impl KernelTable {
    /// Cross product of a 1-D kernel: `weight[r * side + c] = k[r] * k[c]`
    pub fn from_separable(kernel: &[i64]) -> Result<Self, PatternError> {
        let side = kernel.len();
        if side % 2 == 0 {
            return Err(PatternError::EvenKernel(side));
        }
        let weights = kernel
            .iter()
            .flat_map(|&r| kernel.iter().map(move |&c| r.checked_mul(c)))
            .collect::<Option<Vec<_>>>()
            .ok_or(PatternError::KernelOverflow(side))?;
        Self::checked(side, weights)
    }

    /// Kernel from an explicit row-major `side × side` weight grid
    pub fn from_square(side: usize, weights: Vec<i64>) -> Result<Self, PatternError> {
        if side % 2 == 0 {
            return Err(PatternError::EvenKernel(side));
        }
        if side.checked_mul(side) != Some(weights.len()) {
            return Err(PatternError::InvalidShape {
                len: weights.len(),
                width: side,
            });
        }
        Self::checked(side, weights)
    }

    /// Reject weights whose worst-case stencil sum `Σ|w| · 255` leaves `i64`.
    fn checked(side: usize, weights: Vec<i64>) -> Result<Self, PatternError> {
        let bound = weights
            .iter()
            .try_fold(0i64, |acc, w| acc.checked_add(w.checked_abs()?))
            .and_then(|total| total.checked_mul(i64::from(u8::MAX)));
        match bound {
            Some(_) => Ok(Self { side, weights }),
            None => Err(PatternError::KernelOverflow(side)),
        }
    }

    /// Side length (odd)
    pub fn side(&self) -> usize {
        self.side
    }

    /// Total number of taps (`side²`)
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always false for a validated kernel
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Row-major weights
    pub fn weights(&self) -> &[i64] {
        &self.weights
    }

    /// Sum of every weight (the normalizer of an interior element)
    pub fn weight_sum(&self) -> i64 {
        self.weights.iter().sum()
    }

    /// Flat offsets for rows of `width` elements:
    /// `offset[k] = (k / side - side / 2) * width + (k % side - side / 2)`
    pub fn offsets(&self, width: usize) -> Vec<isize> {
        self.taps(width).iter().map(|t| t.offset).collect()
    }

    fn taps(&self, width: usize) -> Vec<Tap> {
        let side = self.side as isize;
        let half = side / 2;
        let width = width as isize;
        self.weights
            .iter()
            .enumerate()
            .map(|(k, &weight)| {
                let k = k as isize;
                Tap {
                    offset: (k / side - half) * width + (k % side - half),
                    weight,
                }
            })
            .collect()
    }
}

/// Apply `kernel` to every element of a row-major plane `width` elements wide.
///
/// Taps falling outside `[0, input.len())` are skipped and excluded from the
/// normalizer, so edge elements divide by the sum of the weights actually
/// applied. Bounds are checked on the flat index: a tap past the end of a row
/// reads the neighboring row. Results are truncated toward zero and clamped
/// to `0..=255`. When the applied weights sum to zero the input element is
/// kept.
pub fn map_stencil(
    input: &[u8],
    width: usize,
    kernel: &KernelTable,
    policy: &ExecutionPolicy,
) -> Result<Vec<u8>, PatternError> {
    if input.is_empty() {
        return Ok(Vec::new());
    }
    if width == 0 || input.len() % width != 0 {
        return Err(PatternError::InvalidShape {
            len: input.len(),
            width,
        });
    }

    let taps = kernel.taps(width);
    let mut out = vec![0u8; input.len()];
    policy.for_each_block(&mut out, |offset, block| {
        for (j, px) in block.iter_mut().enumerate() {
            *px = apply_taps(input, offset + j, &taps);
        }
    });
    Ok(out)
}

#[inline]
fn apply_taps(input: &[u8], index: usize, taps: &[Tap]) -> u8 {
    let len = input.len() as isize;
    let mut value: i64 = 0;
    let mut weight: i64 = 0;

    for tap in taps {
        let at = index as isize + tap.offset;
        if (0..len).contains(&at) {
            value += i64::from(input[at as usize]) * tap.weight;
            weight += tap.weight;
        }
    }

    if weight == 0 {
        return input[index];
    }
    (value / weight).clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Backend;

    fn policies() -> Vec<ExecutionPolicy> {
        Backend::ALL
            .iter()
            .map(|b| ExecutionPolicy::new(*b, 3).unwrap())
            .collect()
    }

    #[test]
    fn test_cross_product() {
        let kernel = KernelTable::from_separable(&[1, 2, 1]).unwrap();
        assert_eq!(kernel.side(), 3);
        assert_eq!(kernel.len(), 9);
        assert_eq!(kernel.weights(), &[1, 2, 1, 2, 4, 2, 1, 2, 1]);
        assert_eq!(kernel.weight_sum(), 16);
    }

    #[test]
    fn test_even_kernel_rejected() {
        assert_eq!(
            KernelTable::from_separable(&[1, 1]),
            Err(PatternError::EvenKernel(2))
        );
        assert_eq!(
            KernelTable::from_separable(&[]),
            Err(PatternError::EvenKernel(0))
        );
    }

    #[test]
    fn test_oversized_weights_rejected() {
        assert_eq!(
            KernelTable::from_separable(&[1, 4_000_000_000, 1]),
            Err(PatternError::KernelOverflow(3))
        );
        // products fit, but 255 times their sum does not
        let big = i64::MAX / 200;
        assert_eq!(
            KernelTable::from_square(1, vec![big]),
            Err(PatternError::KernelOverflow(1))
        );
        assert_eq!(
            KernelTable::from_square(3, vec![i64::MIN, 0, 0, 0, 0, 0, 0, 0, 0]),
            Err(PatternError::KernelOverflow(3))
        );
        let largest = KernelTable::from_square(1, vec![i64::MAX / 255]).unwrap();
        let out = map_stencil(&[255], 1, &largest, &ExecutionPolicy::sequential()).unwrap();
        assert_eq!(out, vec![255]);
    }

    #[test]
    fn test_offsets() {
        let kernel = KernelTable::from_separable(&[1, 1, 1]).unwrap();
        assert_eq!(
            kernel.offsets(10),
            vec![-11, -10, -9, -1, 0, 1, 9, 10, 11]
        );
    }

    #[test]
    fn test_single_pixel_is_identity() {
        for side in [1usize, 3, 5, 7] {
            let kernel = KernelTable::from_separable(&vec![3; side]).unwrap();
            for policy in policies() {
                let out = map_stencil(&[201], 1, &kernel, &policy).unwrap();
                assert_eq!(out, vec![201]);
            }
        }
    }

    #[test]
    fn test_edge_normalization_uses_applied_weights() {
        // 4x1 plane, offsets for width 4: -5 -4 -3 -1 0 1 3 4 5
        let kernel = KernelTable::from_separable(&[1, 1, 1]).unwrap();
        let input = [0u8, 40, 80, 120];
        let out = map_stencil(&input, 4, &kernel, &ExecutionPolicy::sequential()).unwrap();
        // index 0: taps 0,1,3 -> 160 / 3
        // index 1: taps 0,1,2 -> 120 / 3
        // index 2: taps 1,2,3 -> 240 / 3
        // index 3: taps 0,2,3 -> 200 / 3
        assert_eq!(out, vec![53, 40, 80, 66]);
    }

    #[test]
    fn test_policies_agree() {
        let width = 37;
        let input: Vec<u8> = (0..width * 29).map(|i| (i * 31 % 256) as u8).collect();
        let kernel = KernelTable::from_separable(&[1, 4, 6, 4, 1]).unwrap();
        let reference =
            map_stencil(&input, width, &kernel, &ExecutionPolicy::sequential()).unwrap();
        for policy in policies() {
            assert_eq!(
                map_stencil(&input, width, &kernel, &policy).unwrap(),
                reference,
                "policy {}",
                policy
            );
        }
    }

    #[test]
    fn test_negative_weights_clamp() {
        let kernel = KernelTable::from_square(3, vec![0, -1, 0, -1, 8, -1, 0, -1, 0]).unwrap();
        let input = vec![10u8, 10, 10, 10, 250, 10, 10, 10, 10];
        let out = map_stencil(&input, 3, &kernel, &ExecutionPolicy::sequential()).unwrap();
        // centre: (8*250 - 4*10) / 4 = 490 -> clamped to 255
        assert_eq!(out[4], 255);
    }

    #[test]
    fn test_zero_weight_keeps_input() {
        let kernel = KernelTable::from_separable(&[1, 0, -1]).unwrap();
        let out = map_stencil(&[77], 1, &kernel, &ExecutionPolicy::sequential()).unwrap();
        assert_eq!(out, vec![77]);
    }

    #[test]
    fn test_invalid_shape() {
        let kernel = KernelTable::from_separable(&[1]).unwrap();
        let err = map_stencil(&[1, 2, 3], 2, &kernel, &ExecutionPolicy::sequential());
        assert_eq!(err, Err(PatternError::InvalidShape { len: 3, width: 2 }));
    }

    #[test]
    fn test_map_indexed() {
        for policy in policies() {
            let squares = map_indexed(1000, |i| i * i, &policy);
            assert_eq!(squares.len(), 1000);
            assert!(squares.iter().enumerate().all(|(i, &v)| v == i * i));
        }
    }
}
