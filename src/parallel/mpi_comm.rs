//! MPI-based parallel communication module.
//!
//! This module provides an implementation of the `Comm` trait using the MPI (Message Passing Interface)
//! backend for distributed-memory parallelism. Each MPI process is one participant of the group; the
//! collectives map directly onto `MPI_Scatterv`, `MPI_Reduce` (sum) and `MPI_Bcast`.
//! The implementation is only available when the `mpi` feature is enabled.
//!
//! # Example
//! ```no_run
//! # #[cfg(feature = "mpi")]
//! # fn main() -> Result<(), parareg::RegError> {
//! use parareg::parallel::{Comm, MpiComm};
//! let comm = MpiComm::new()?;
//! println!("Rank: {} / {}", comm.rank(), comm.size());
//! comm.barrier()?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "mpi"))]
//! # fn main() {}
//! ```

use super::{check_root, check_scatter, Comm, Partition};
use crate::error::{zeroed, RegError};
use mpi::collective::SystemOperation;
use mpi::datatype::Partition as MpiPartition;
use mpi::environment::Universe;
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;
use mpi::Count;

/// MPI communicator wrapper for distributed parallelism.
///
/// Holds the MPI world communicator and the universe that keeps MPI initialized;
/// MPI is finalized when this value is dropped.
pub struct MpiComm {
    /// The MPI world communicator (all processes in the job).
    world: SimpleCommunicator,
    /// The rank (ID) of this process within the communicator.
    rank: usize,
    /// The total number of processes in the communicator.
    size: usize,
    _universe: Universe,
}

impl MpiComm {
    /// Initializes MPI and constructs a new `MpiComm` instance.
    pub fn new() -> Result<Self, RegError> {
        let universe = mpi::initialize()
            .ok_or_else(|| RegError::CommInit("MPI already initialized".into()))?;
        let world = universe.world();
        let rank = world.rank() as usize;
        let size = world.size() as usize;
        Ok(MpiComm { world, rank, size, _universe: universe })
    }

    /// Terminates every process of the job with `code` (`MPI_Abort`).
    /// Peers blocked in a collective do not return otherwise.
    pub fn abort(&self, code: i32) -> ! {
        self.world.abort(code)
    }
}

fn to_counts(values: &[usize]) -> Result<Vec<Count>, RegError> {
    values
        .iter()
        .map(|&v| {
            Count::try_from(v).map_err(|_| {
                RegError::Precondition(format!("{v} elements exceed the MPI count range"))
            })
        })
        .collect()
}

impl Comm for MpiComm {
    /// Returns the rank (ID) of this process.
    fn rank(&self) -> usize { self.rank }
    /// Returns the total number of processes in the communicator.
    fn size(&self) -> usize { self.size }
    /// Synchronizes all processes at a barrier.
    fn barrier(&self) -> Result<(), RegError> {
        self.world.barrier();
        Ok(())
    }

    /// Distributes each rank's range of a global array (`MPI_Scatterv`).
    fn scatter_rows(
        &self,
        global: Option<&[f64]>,
        partition: &Partition,
        root: usize,
    ) -> Result<Vec<f64>, RegError> {
        check_root(self.size, root)?;
        check_scatter(global, partition, self.size, self.rank == root)?;
        let mut out = zeroed("scatter slice", partition.count(self.rank))?;
        let root_process = self.world.process_at_rank(root as i32);
        if self.rank == root {
            let counts = to_counts(partition.counts())?;
            let displs = to_counts(partition.offsets())?;
            let source = MpiPartition::new(global.unwrap_or_default(), counts, displs);
            root_process.scatter_varcount_into_root(&source, &mut out[..]);
        } else {
            root_process.scatter_varcount_into(&mut out[..]);
        }
        Ok(out)
    }

    /// Sums `local` element-wise into the root process (`MPI_Reduce`).
    fn reduce_sum(&self, local: &[f64], root: usize) -> Result<Option<Vec<f64>>, RegError> {
        check_root(self.size, root)?;
        let root_process = self.world.process_at_rank(root as i32);
        if self.rank == root {
            let mut out = zeroed("reduction result", local.len())?;
            root_process.reduce_into_root(local, &mut out[..], SystemOperation::sum());
            Ok(Some(out))
        } else {
            root_process.reduce_into(local, SystemOperation::sum());
            Ok(None)
        }
    }

    /// Replicates the root's buffer on every process (`MPI_Bcast`).
    fn broadcast(&self, buf: &mut [f64], root: usize) -> Result<(), RegError> {
        check_root(self.size, root)?;
        self.world.process_at_rank(root as i32).broadcast_into(buf);
        Ok(())
    }
}
