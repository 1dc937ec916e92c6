//! Dense matrix-vector product `res = mat * vec`.
//!
//! Rows are distributed across the policy's workers with `map_indexed`; each
//! row's dot product is a sequential left fold, so every backend produces the
//! same bits as the sequential one.

use patbench_core::{ExecutionPolicy, PatternError, dot, map_indexed};

/// Row-major dense matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Wrap row-major `data`; its length must be `rows * cols`
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, PatternError> {
        if data.len() != rows * cols {
            return Err(PatternError::InvalidShape {
                len: data.len(),
                width: cols,
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// All-zero matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row `i`
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Row-major storage
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

/// `row · vec`
pub fn ddot(row: &[f64], vec: &[f64], policy: &ExecutionPolicy) -> f64 {
    dot(row, vec, policy)
}

/// `mat * vec`; `vec` must have one entry per column
pub fn dgemv(mat: &Matrix, vec: &[f64], policy: &ExecutionPolicy) -> Result<Vec<f64>, PatternError> {
    if vec.len() != mat.cols {
        return Err(PatternError::InvalidShape {
            len: vec.len(),
            width: mat.cols,
        });
    }
    tracing::debug!(rows = mat.rows, cols = mat.cols, policy = %policy, "dgemv");
    let sequential = ExecutionPolicy::sequential();
    Ok(map_indexed(
        mat.rows,
        |i| ddot(mat.row(i), vec, &sequential),
        policy,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use patbench_core::Backend;

    #[test]
    fn test_small_product() {
        let mat = Matrix::new(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let res = dgemv(&mat, &[1.0, 0.0, -1.0], &ExecutionPolicy::sequential()).unwrap();
        assert_eq!(res, vec![-2.0, -2.0]);
    }

    #[test]
    fn test_shape_checked() {
        assert!(Matrix::new(2, 2, vec![1.0; 3]).is_err());
        let mat = Matrix::zeros(2, 2);
        assert_eq!(
            dgemv(&mat, &[1.0], &ExecutionPolicy::sequential()),
            Err(PatternError::InvalidShape { len: 1, width: 2 })
        );
    }

    #[test]
    fn test_integer_valued_entries_exact_across_policies() {
        let (rows, cols) = (7, 9000);
        let data: Vec<f64> = (0..rows * cols).map(|i| (i % 1000 + 1) as f64).collect();
        let vec: Vec<f64> = (0..cols).map(|i| (i % 17 + 1) as f64).collect();
        let mat = Matrix::new(rows, cols, data).unwrap();
        let reference = dgemv(&mat, &vec, &ExecutionPolicy::sequential()).unwrap();

        for backend in Backend::ALL {
            let policy = ExecutionPolicy::new(backend, 4).unwrap();
            assert_eq!(dgemv(&mat, &vec, &policy).unwrap(), reference);
        }
    }

    #[test]
    fn test_fractional_rows_bit_identical_across_policies() {
        // rows longer than one reduction block, so a blocked dot would reassociate
        let (rows, cols) = (64, 9000);
        let data: Vec<f64> = (0..rows * cols).map(|i| ((i * 7) % 13) as f64 * 0.1).collect();
        let vec: Vec<f64> = (0..cols).map(|i| 1.0 / (i + 3) as f64).collect();
        let mat = Matrix::new(rows, cols, data).unwrap();
        let reference = dgemv(&mat, &vec, &ExecutionPolicy::sequential()).unwrap();

        for backend in Backend::ALL {
            let policy = ExecutionPolicy::new(backend, 4).unwrap();
            let res = dgemv(&mat, &vec, &policy).unwrap();
            assert!(
                res.iter().zip(&reference).all(|(a, b)| a.to_bits() == b.to_bits()),
                "policy {}",
                policy
            );
        }
    }

    #[test]
    fn test_empty_matrix() {
        let mat = Matrix::zeros(0, 4);
        let res = dgemv(&mat, &[1.0; 4], &ExecutionPolicy::sequential()).unwrap();
        assert!(res.is_empty());
    }
}
