//! Matrix module: dense matrix conversions.

pub mod dense;
pub use dense::DenseMatrix;
