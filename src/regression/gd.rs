//! Batch gradient descent with a fixed iteration budget.
//!
//! `beta` starts at zero. Each iteration the coordinator broadcasts `beta`,
//! every rank computes `Xᵀ(X·beta − y)` on its rows, the gradients are summed at
//! the coordinator and it applies `beta -= (learning_rate / n) · gradient`,
//! where `n` is the global sample count from [`ProblemShape`] on every rank.
//! Data is distributed once, before the loop. There is no convergence check.

use super::aggregate::gradient;
use super::{distribute, Dataset, ProblemShape};
use crate::config::GdOptions;
use crate::error::{zeroed, RegError};
use crate::parallel::{Comm, Coordinator, Role, Worker};
use log::{debug, info};

pub struct GdEngine {
    options: GdOptions,
}

fn apply_step(beta: &mut [f64], grad: &[f64], step: f64) {
    for (b, g) in beta.iter_mut().zip(grad) {
        *b -= step * g;
    }
}

impl GdEngine {
    pub fn new(options: GdOptions) -> Result<Self, RegError> {
        options.validate()?;
        Ok(GdEngine { options })
    }

    pub fn options(&self) -> GdOptions {
        self.options
    }

    /// Coordinator side of one GD run. Returns the final `beta`.
    pub fn coordinate<C: Comm>(
        &self,
        coord: &Coordinator<'_, C>,
        data: &Dataset<'_>,
    ) -> Result<Vec<f64>, RegError> {
        self.coordinate_observed(coord, data, |_, _| {})
    }

    /// Like [`coordinate`](Self::coordinate), calling `on_step(iteration, beta)`
    /// after every update (iterations count from 1).
    pub fn coordinate_observed<C, F>(
        &self,
        coord: &Coordinator<'_, C>,
        data: &Dataset<'_>,
        mut on_step: F,
    ) -> Result<Vec<f64>, RegError>
    where
        C: Comm,
        F: FnMut(usize, &[f64]),
    {
        let shape = data.shape();
        let GdOptions { iterations, learning_rate } = self.options;
        info!(
            "GD: n={}, d={}, {} iterations at rate {} over {} ranks",
            shape.samples,
            shape.features,
            iterations,
            learning_rate,
            coord.size()
        );
        let shard = distribute::scatter(coord, data)?;
        let step = learning_rate / shape.samples as f64;
        let mut beta = zeroed("beta", shape.features)?;
        for it in 1..=iterations {
            coord.broadcast(&mut beta)?;
            let local = gradient(shard.rows(), &beta)?;
            let grad = coord.reduce(&local)?;
            apply_step(&mut beta, &grad, step);
            on_step(it, &beta);
            if it % 100 == 0 {
                debug!("GD: iteration {it}/{iterations}");
            }
        }
        info!("GD: finished {iterations} iterations");
        Ok(beta)
    }

    /// Worker side of one GD run.
    pub fn work<C: Comm>(&self, worker: &Worker<'_, C>, shape: ProblemShape) -> Result<(), RegError> {
        let shard = distribute::receive(worker, shape)?;
        let mut beta = zeroed("beta snapshot", shape.features)?;
        for _ in 0..self.options.iterations {
            worker.receive_broadcast(&mut beta)?;
            let local = gradient(shard.rows(), &beta)?;
            worker.contribute(&local)?;
        }
        debug!("rank {} finished {} iterations", worker.rank(), self.options.iterations);
        Ok(())
    }

    /// Run on whichever side `comm` is. Returns `Some(beta)` on the coordinator only.
    pub fn run<C: Comm>(
        &self,
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
}

/// Single-process gradient descent over the undivided dataset.
pub fn gd_serial(data: &Dataset<'_>, options: GdOptions) -> Result<Vec<f64>, RegError> {
    options.validate()?;
    let shape = data.shape();
    let step = options.learning_rate / shape.samples as f64;
    let mut beta = zeroed("beta", shape.features)?;
    for _ in 0..options.iterations {
        let grad = gradient(data.rows(), &beta)?;
        apply_step(&mut beta, &grad, step);
    }
    Ok(beta)
}
