//! Random inputs for dgemv and mergesort.
//!
//! Values are drawn uniformly from `1..=1000`. A seed makes a run
//! reproducible; without one the generator is seeded from entropy.

use crate::dgemv::Matrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Smallest generated value
pub const MIN_VALUE: i32 = 1;
/// Largest generated value
pub const MAX_VALUE: i32 = 1000;

/// Uniform integer generator
#[derive(Debug, Clone)]
pub struct DataGen {
    rng: StdRng,
}

impl DataGen {
    /// Seeded generator, or entropy-seeded when `seed` is `None`
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    fn value(&mut self) -> i32 {
        self.rng.gen_range(MIN_VALUE..=MAX_VALUE)
    }

    /// `len` integers
    pub fn integers(&mut self, len: usize) -> Vec<i32> {
        (0..len).map(|_| self.value()).collect()
    }

    /// `len` integer-valued doubles
    pub fn vector(&mut self, len: usize) -> Vec<f64> {
        (0..len).map(|_| f64::from(self.value())).collect()
    }

    /// `rows × cols` matrix of integer-valued doubles
    pub fn matrix(&mut self, rows: usize, cols: usize) -> Matrix {
        let mut mat = Matrix::zeros(rows, cols);
        for slot in mat.as_mut_slice() {
            *slot = f64::from(self.value());
        }
        mat
    }
}
