//! Coordinator and worker capabilities over a [`Comm`].
//!
//! Exactly one rank of a group (the root) is the coordinator: it owns the full
//! dataset and the authoritative parameter vector, scatters slices, receives
//! reductions and broadcasts state. Every other rank is a worker, which can only
//! receive its slice, contribute to reductions and receive broadcasts. Both
//! compute on their own slice; neither touches the other's memory.

use super::{check_root, Comm, Partition};
use crate::error::RegError;

/// Rank that coordinates when none is specified.
pub const DEFAULT_ROOT: usize = 0;

/// The root's side of every collective.
pub struct Coordinator<'c, C: Comm> {
    comm: &'c C,
    root: usize,
}

/// A non-root participant's side of every collective.
pub struct Worker<'c, C: Comm> {
    comm: &'c C,
    root: usize,
}

pub enum Role<'c, C: Comm> {
    Coordinator(Coordinator<'c, C>),
    Worker(Worker<'c, C>),
}

impl<'c, C: Comm> Role<'c, C> {
    /// Role of this rank when [`DEFAULT_ROOT`] coordinates.
    pub fn of(comm: &'c C) -> Result<Self, RegError> {
        Self::with_root(comm, DEFAULT_ROOT)
    }

    pub fn with_root(comm: &'c C, root: usize) -> Result<Self, RegError> {
        check_root(comm.size(), root)?;
        Ok(if comm.rank() == root {
            Role::Coordinator(Coordinator { comm, root })
        } else {
            Role::Worker(Worker { comm, root })
        })
    }

    pub fn is_coordinator(&self) -> bool {
        matches!(self, Role::Coordinator(_))
    }
}

impl<'c, C: Comm> Coordinator<'c, C> {
    pub fn rank(&self) -> usize {
        self.root
    }

    /// Number of participants, the coordinator included.
    pub fn size(&self) -> usize {
        self.comm.size()
    }

    pub fn barrier(&self) -> Result<(), RegError> {
        self.comm.barrier()
    }

    /// Send every rank its range of `global`, returning the coordinator's own range.
    pub fn scatter(&self, global: &[f64], partition: &Partition) -> Result<Vec<f64>, RegError> {
        self.comm.scatter_rows(Some(global), partition, self.root)
    }

    /// Sum `local` with every worker's contribution.
    pub fn reduce(&self, local: &[f64]) -> Result<Vec<f64>, RegError> {
        self.comm
            .reduce_sum(local, self.root)?
            .ok_or_else(|| RegError::Protocol("reduction result missing at the root".into()))
    }

    /// Replicate `state` on every worker. The coordinator's copy is left as is.
    pub fn broadcast(&self, state: &mut [f64]) -> Result<(), RegError> {
        self.comm.broadcast(state, self.root)
    }
}

impl<'c, C: Comm> Worker<'c, C> {
    pub fn rank(&self) -> usize {
        self.comm.rank()
    }

    pub fn size(&self) -> usize {
        self.comm.size()
    }

    pub fn barrier(&self) -> Result<(), RegError> {
        self.comm.barrier()
    }

    /// Receive this worker's range of the coordinator's scatter.
    pub fn receive(&self, partition: &Partition) -> Result<Vec<f64>, RegError> {
        self.comm.scatter_rows(None, partition, self.root)
    }

    /// Add `local` into the coordinator's reduction.
    pub fn contribute(&self, local: &[f64]) -> Result<(), RegError> {
        match self.comm.reduce_sum(local, self.root)? {
            None => Ok(()),
            Some(_) => Err(RegError::Protocol(format!(
                "worker rank {} received a reduction result",
                self.rank()
            ))),
        }
    }

    /// Overwrite `state` with the coordinator's broadcast.
    pub fn receive_broadcast(&self, state: &mut [f64]) -> Result<(), RegError> {
        self.comm.broadcast(state, self.root)
    }
}
