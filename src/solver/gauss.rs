//! Gaussian elimination with partial pivoting.
//!
//! For each pivot column `k` the row with the largest `|a[i][k]|`, `i >= k`, is
//! swapped into place, then every row below is reduced by
//! `factor = a[i][k] / a[k][k]`. If the largest candidate is below the pivot
//! tolerance (default `1e-12`) the system is reported singular and no solution
//! is written. Back-substitution runs from the last row up.
//!
//! The caller's matrix and right-hand side are copied into owned scratch
//! buffers, so `a` and `b` are left untouched and can be used to measure the
//! residual. No symmetry or definiteness of `a` is assumed.
//!
//! # References
//! - Golub & Van Loan, Matrix Computations, §3.4

use crate::error::RegError;
use crate::matrix::DenseMatrix;
use crate::solver::{LinearSolver, SolveStats};
use faer::Mat;
use num_traits::{Float, NumCast};

/// Pivot magnitude below which a column counts as singular.
pub const DEFAULT_PIVOT_TOL: f64 = 1e-12;

pub struct GaussSolver<T> {
    pivot_tol: T,
}

impl<T: Float> GaussSolver<T> {
    pub fn new() -> Self {
        let pivot_tol = <T as NumCast>::from(DEFAULT_PIVOT_TOL).unwrap_or_else(T::epsilon);
        GaussSolver { pivot_tol }
    }

    pub fn with_pivot_tol(pivot_tol: T) -> Self {
        GaussSolver { pivot_tol }
    }

    pub fn pivot_tol(&self) -> T {
        self.pivot_tol
    }

    /// Reduce row-major `m` (n×n) and `rhs` to upper-triangular form in place.
    fn eliminate(&self, m: &mut [T], rhs: &mut [T], n: usize) -> Result<(), RegError> {
        for k in 0..n {
            let mut pivot_row = k;
            let mut pivot_abs = m[k * n + k].abs();
            for i in (k + 1)..n {
                let v = m[i * n + k].abs();
                if v > pivot_abs {
                    pivot_abs = v;
                    pivot_row = i;
                }
            }
            // NaN compares false, so a poisoned column is singular too
            if !(pivot_abs >= self.pivot_tol) {
                return Err(RegError::SingularMatrix {
                    column: k,
                    pivot: pivot_abs.to_f64().unwrap_or(f64::NAN),
                });
            }
            if pivot_row != k {
                for j in 0..n {
                    m.swap(k * n + j, pivot_row * n + j);
                }
                rhs.swap(k, pivot_row);
            }
            let pivot = m[k * n + k];
            for i in (k + 1)..n {
                let factor = m[i * n + k] / pivot;
                for j in k..n {
                    m[i * n + j] = m[i * n + j] - factor * m[k * n + j];
                }
                rhs[i] = rhs[i] - factor * rhs[k];
            }
        }
        Ok(())
    }

    fn back_substitute(m: &[T], rhs: &[T], n: usize) -> Vec<T> {
        let mut x = vec![T::zero(); n];
        for i in (0..n).rev() {
            let mut acc = rhs[i];
            for j in (i + 1)..n {
                acc = acc - m[i * n + j] * x[j];
            }
            x[i] = acc / m[i * n + i];
        }
        x
    }
}

impl<T: Float> Default for GaussSolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> LinearSolver<Mat<T>, Vec<T>> for GaussSolver<T> {
    type Error = RegError;
    type Scalar = T;

    /// Solve Ax = b.
    ///
    /// # Returns
    /// * `Ok(SolveStats)` with the residual of the solution
    /// * `Err(RegError::SingularMatrix)` with `x` left unchanged
    fn solve(&mut self, a: &Mat<T>, b: &Vec<T>, x: &mut Vec<T>) -> Result<SolveStats<T>, RegError> {
        let n = a.nrows();
        if a.ncols() != n {
            return Err(RegError::Precondition(format!(
                "Gaussian elimination needs a square matrix, got {}x{}",
                n,
                a.ncols()
            )));
        }
        if b.len() != n {
            return Err(RegError::Precondition(format!(
                "right-hand side has length {}, expected {n}",
                b.len()
            )));
        }
        let mut m = a.to_row_major_data();
        let mut rhs = b.clone();
        self.eliminate(&mut m, &mut rhs, n)?;
        let solution = Self::back_substitute(&m, &rhs, n);

        let mut res_sq = T::zero();
        for i in 0..n {
            let mut r = b[i];
            for j in 0..n {
                r = r - a[(i, j)] * solution[j];
            }
            res_sq = res_sq + r * r;
        }
        *x = solution;
        Ok(SolveStats { final_residual: res_sq.sqrt() })
    }
}
