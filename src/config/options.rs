//! Command-line or API options for a regression run.
//!
//! This module provides the `RunOptions` struct, which selects the estimator
//! (OLS or gradient descent), the problem size, the data seed and the worker
//! count, and `GdOptions`, the iteration budget and step size used by
//! gradient descent. `RunOptions` derives its command line with clap; call
//! `RunOptions::validate` after parsing.

use crate::error::RegError;
use clap::{Args, Parser, ValueEnum};
use std::fmt;
use std::str::FromStr;

/// Estimator selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    /// Normal equations solved by Gaussian elimination.
    #[default]
    Ols,
    /// Fixed-budget batch gradient descent.
    Gd,
}

impl FromStr for Algorithm {
    type Err = RegError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Algorithm as ValueEnum>::from_str(s, true).map_err(|_| {
            RegError::Precondition(format!("unknown algorithm '{s}', use 'ols' or 'gd'"))
        })
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Ols => f.write_str("ols"),
            Algorithm::Gd => f.write_str("gd"),
        }
    }
}

/// Gradient descent parameters.
#[derive(Clone, Copy, Debug, PartialEq, Args)]
pub struct GdOptions {
    /// GD iterations; there is no early stopping
    #[arg(short = 'i', long, default_value_t = 1000)]
    pub iterations: usize,

    /// GD step size, scaled by 1/n for the global sample count n
    #[arg(short = 'l', long, default_value_t = 0.01)]
    pub learning_rate: f64,
}

impl Default for GdOptions {
    fn default() -> Self {
        GdOptions { iterations: 1000, learning_rate: 0.01 }
    }
}

impl GdOptions {
    pub fn new(iterations: usize, learning_rate: f64) -> Result<Self, RegError> {
        let opts = GdOptions { iterations, learning_rate };
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> Result<(), RegError> {
        if self.iterations == 0 {
            return Err(RegError::Precondition("iteration count must be positive".into()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(RegError::Precondition(format!(
                "learning rate must be positive and finite, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

/// Everything a driver needs to set up one run.
#[derive(Clone, Debug, PartialEq, Parser)]
#[command(name = "regress")]
#[command(about = "Parallel linear regression on synthetic data", long_about = None)]
pub struct RunOptions {
    /// Estimator to run
    #[arg(short = 'a', long, value_enum, default_value_t = Algorithm::Ols)]
    pub algorithm: Algorithm,

    /// Number of samples
    #[arg(short = 'n', long, default_value_t = 100_000)]
    pub samples: usize,

    /// Number of features
    #[arg(short = 'd', long, default_value_t = 100)]
    pub features: usize,

    /// Random seed for the synthetic data
    #[arg(short = 's', long, default_value_t = 42)]
    pub seed: u64,

    /// Size of an in-process worker group (default: one per CPU).
    /// Ignored when the group comes from the runtime (MPI).
    #[arg(short = 'p', long)]
    pub workers: Option<usize>,

    #[command(flatten)]
    pub gd: GdOptions,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            algorithm: Algorithm::Ols,
            samples: 100_000,
            features: 100,
            seed: 42,
            workers: None,
            gd: GdOptions::default(),
        }
    }
}

impl RunOptions {
    /// Checks what the argument parser cannot: gradient descent parameters
    /// and a non-empty worker group.
    pub fn validate(&self) -> Result<(), RegError> {
        if self.workers == Some(0) {
            return Err(RegError::Precondition("worker count must be positive".into()));
        }
        if self.algorithm == Algorithm::Gd {
            self.gd.validate()?;
        }
        Ok(())
    }
}
