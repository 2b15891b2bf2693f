//! Ordinary least squares via the normal equations `(XᵀX) β = Xᵀy`.
//!
//! Pipeline: partition, scatter `X` and `y`, accumulate local `XᵀX` / `Xᵀy` on
//! every rank, sum both to the coordinator, solve there. Only the coordinator
//! produces `beta`; a singular system fails the whole call.

use super::aggregate::{normal_equations, NormalEquations};
use super::{distribute, Dataset, ProblemShape};
use crate::error::RegError;
use crate::matrix::DenseMatrix;
use crate::parallel::{Comm, Coordinator, Role, Worker};
use crate::solver::{GaussSolver, LinearSolver};
use faer::Mat;
use log::{debug, info};

#[derive(Default)]
pub struct OlsEngine {
    solver: GaussSolver<f64>,
}

impl OlsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_solver(solver: GaussSolver<f64>) -> Self {
        OlsEngine { solver }
    }

    /// Coordinator side of one OLS run. Returns `beta` of length `d`.
    pub fn coordinate<C: Comm>(
        &mut self,
        coord: &Coordinator<'_, C>,
        data: &Dataset<'_>,
    ) -> Result<Vec<f64>, RegError> {
        let shape = data.shape();
        info!(
            "OLS: n={}, d={} over {} ranks",
            shape.samples,
            shape.features,
            coord.size()
        );
        let shard = distribute::scatter(coord, data)?;
        let local = normal_equations(shard.rows())?;
        let xtx = coord.reduce(&local.xtx)?;
        let xty = coord.reduce(&local.xty)?;
        debug!("OLS: reduced normal equations at the coordinator");
        let beta = self.solve(shape.features, &NormalEquations { xtx, xty })?;
        info!("OLS: solved for {} coefficients", beta.len());
        Ok(beta)
    }

    /// Worker side of one OLS run.
    pub fn work<C: Comm>(&self, worker: &Worker<'_, C>, shape: ProblemShape) -> Result<(), RegError> {
        let shard = distribute::receive(worker, shape)?;
        let local = normal_equations(shard.rows())?;
        worker.contribute(&local.xtx)?;
        worker.contribute(&local.xty)?;
        debug!("rank {} contributed its normal equations", worker.rank());
        Ok(())
    }

    /// Run on whichever side `comm` is. The coordinator must pass `data`;
    /// workers may pass `None`. Returns `Some(beta)` on the coordinator only.
    pub fn run<C: Comm>(
        &mut self,
        comm: &C,
        shape: ProblemShape,
        data: Option<&Dataset<'_>>,
    ) -> Result<Option<Vec<f64>>, RegError> {
        match Role::of(comm)? {
            Role::Coordinator(coord) => {
                let data = data.ok_or_else(|| {
                    RegError::Precondition("the coordinator must hold the dataset".into())
                })?;
                if data.shape() != shape {
                    return Err(RegError::Precondition(format!(
                        "dataset shape {:?} differs from the agreed {:?}",
                        data.shape(),
                        shape
                    )));
                }
                self.coordinate(&coord, data).map(Some)
            }
            Role::Worker(worker) => self.work(&worker, shape).map(|_| None),
        }
    }

    /// Solve already-summed normal equations.
    pub fn solve(&mut self, features: usize, ne: &NormalEquations) -> Result<Vec<f64>, RegError> {
        let a = Mat::<f64>::from_row_major_data(features, features, &ne.xtx)?;
        let mut beta = Vec::new();
        let stats = self.solver.solve(&a, &ne.xty, &mut beta)?;
        debug!("normal equations residual {:.3e}", stats.final_residual);
        Ok(beta)
    }
}

/// Single-process OLS over the undivided dataset.
pub fn ols_serial(data: &Dataset<'_>) -> Result<Vec<f64>, RegError> {
    let ne = normal_equations(data.rows())?;
    OlsEngine::new().solve(data.shape().features, &ne)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parallel::SerialComm;

    #[test]
    fn recovers_exact_coefficients() {
        // y = 2*x0 - 3*x1
        let x = [1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, -1.0];
        let y = [2.0, -3.0, -1.0, 7.0];
        let shape = ProblemShape::new(4, 2).unwrap();
        let data = Dataset::new(&x, &y, shape).unwrap();
        let beta = ols_serial(&data).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-12 && (beta[1] + 3.0).abs() < 1e-12);
    }

    #[test]
    fn run_on_single_rank_matches_serial() {
        let x = [1.0, 2.0, 3.0, 5.0, 4.0, 1.0];
        let y = [1.0, 2.0, 3.0];
        let shape = ProblemShape::new(3, 2).unwrap();
        let data = Dataset::new(&x, &y, shape).unwrap();
        let beta = OlsEngine::new().run(&SerialComm::new(), shape, Some(&data)).unwrap();
        assert_eq!(beta, Some(ols_serial(&data).unwrap()));
    }

    #[test]
    fn duplicate_column_is_singular() {
        let x = [1.0, 1.0, 2.0, 2.0, 3.0, 3.0];
        let y = [1.0, 2.0, 3.0];
        let shape = ProblemShape::new(3, 2).unwrap();
        let data = Dataset::new(&x, &y, shape).unwrap();
        assert!(matches!(ols_serial(&data), Err(RegError::SingularMatrix { .. })));
    }

    #[test]
    fn coordinator_without_data_is_rejected() {
        let shape = ProblemShape::new(3, 2).unwrap();
        let err = OlsEngine::new().run(&SerialComm::new(), shape, None).unwrap_err();
        assert!(matches!(err, RegError::Precondition(_)));
    }
}
