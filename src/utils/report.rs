//! Run summaries for the coordinator.

use crate::config::Algorithm;
use crate::regression::ProblemShape;
use crate::utils::metrics::vector_diff_norm;
use std::fmt;
use std::time::Duration;

/// Number of coefficients shown in the human summary.
const SHOWN_COEFFICIENTS: usize = 5;

pub const CSV_HEADER: &str = "algorithm,n,d,processes,time_seconds";

/// Outcome of a successful run. Built only from a validly produced `beta`.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    pub algorithm: Algorithm,
    pub shape: ProblemShape,
    pub processes: usize,
    pub elapsed: Duration,
    pub beta: Vec<f64>,
    /// ‖beta_true − beta‖₂ when the ground truth is known.
    pub error: Option<f64>,
}

impl RunReport {
    pub fn new(
        algorithm: Algorithm,
        shape: ProblemShape,
        processes: usize,
        elapsed: Duration,
        beta: Vec<f64>,
        beta_true: Option<&[f64]>,
    ) -> Self {
        let error = beta_true.map(|t| vector_diff_norm(t, &beta));
        RunReport { algorithm, shape, processes, elapsed, beta, error }
    }

    pub fn csv_row(&self) -> String {
        format!(
            "{},{},{},{},{:.6}",
            self.algorithm,
            self.shape.samples,
            self.shape.features,
            self.processes,
            self.elapsed.as_secs_f64()
        )
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Results ===")?;
        writeln!(f, "Execution time: {:.6} seconds", self.elapsed.as_secs_f64())?;
        writeln!(f)?;
        let shown = self.beta.len().min(SHOWN_COEFFICIENTS);
        writeln!(f, "Computed beta (first {shown}):")?;
        for (i, b) in self.beta.iter().take(shown).enumerate() {
            writeln!(f, "  beta[{i}] = {b:.6}")?;
        }
        if let Some(err) = self.error {
            writeln!(f)?;
            writeln!(f, "Error ||beta_true - beta_computed|| = {err:.6e}")?;
        }
        writeln!(f)?;
        writeln!(f, "=== CSV Output ===")?;
        writeln!(f, "{CSV_HEADER}")?;
        write!(f, "{}", self.csv_row())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_and_summary() {
        let shape = ProblemShape::new(100, 2).unwrap();
        let report = RunReport::new(
            Algorithm::Gd,
            shape,
            4,
            Duration::from_millis(1500),
            vec![1.0, 2.0],
            Some(&[1.0, 2.0][..]),
        );
        assert_eq!(report.csv_row(), "gd,100,2,4,1.500000");
        assert_eq!(report.error, Some(0.0));
        let text = report.to_string();
        assert!(text.contains("beta[1] = 2.000000"));
        assert!(text.ends_with("gd,100,2,4,1.500000"));
    }
}
