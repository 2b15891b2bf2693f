//! parareg: distributed linear regression over a fixed worker group
//!
//! This crate estimates linear-regression coefficients from a row-major design
//! matrix `X` (n × d) and response `y` with two estimators: ordinary least
//! squares through the normal equations, solved by Gaussian elimination with
//! partial pivoting, and fixed-budget batch gradient descent. Rows are
//! partitioned across the participants of a [`parallel::Comm`] group (a single
//! process, an in-process rayon group, or MPI), aggregated locally and summed
//! at the coordinator.

pub mod parallel;

pub mod config;
pub mod data;
pub mod error;
pub mod matrix;
pub mod regression;
pub mod solver;
pub mod utils;

// Re-exports for convenience
pub use config::*;
pub use error::*;
pub use matrix::*;
pub use regression::*;
pub use solver::*;

pub use data::SyntheticData;
pub use parallel::{Comm, Coordinator, Partition, Role, SerialComm, Worker};
#[cfg(feature = "rayon")]
pub use parallel::RayonComm;
#[cfg(feature = "mpi")]
pub use parallel::MpiComm;
pub use utils::RunReport;
