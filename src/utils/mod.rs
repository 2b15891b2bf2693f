//! Metrics, timing and reporting helpers.

pub mod metrics;
pub mod report;
pub mod timing;

pub use metrics::{mse, predict, residual_mse, vector_diff_norm};
pub use report::RunReport;
pub use timing::timed;
