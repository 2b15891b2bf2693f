//! Run configuration.

pub mod options;
pub use options::{Algorithm, GdOptions, RunOptions};
