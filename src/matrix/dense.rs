//! Dense‐matrix API on top of Faer.
//!
//! Regression buffers travel between participants as flat row-major arrays;
//! this module converts between that layout and `faer::Mat<T>`.

use crate::error::RegError;
use faer::Mat;

/// Row-major conversions for dense matrices.
pub trait DenseMatrix<T>: Sized {
    /// Construct from row-major storage of length `nrows * ncols`.
    fn from_row_major_data(nrows: usize, ncols: usize, data: &[T]) -> Result<Self, RegError>;
    /// Copy out as row-major storage.
    fn to_row_major_data(&self) -> Vec<T>;
}

impl<T: Copy> DenseMatrix<T> for Mat<T> {
    fn from_row_major_data(nrows: usize, ncols: usize, data: &[T]) -> Result<Self, RegError> {
        if nrows.checked_mul(ncols) != Some(data.len()) {
            return Err(RegError::Precondition(format!(
                "{} values cannot fill a {nrows}x{ncols} matrix",
                data.len()
            )));
        }
        Ok(Mat::from_fn(nrows, ncols, |i, j| data[i * ncols + j]))
    }

    fn to_row_major_data(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.nrows() * self.ncols());
        for i in 0..self.nrows() {
            for j in 0..self.ncols() {
                out.push(self[(i, j)]);
            }
        }
        out
    }
}
