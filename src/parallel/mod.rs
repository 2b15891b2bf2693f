//! Collective communication over a fixed group of participants.
//!
//! Every operation on [`Comm`] is collective: all ranks of the group must call
//! it, in the same order, with the same `root`. A collective returns only once
//! every participant has arrived, so they double as barriers.

use crate::error::RegError;

pub mod partition;
pub use partition::Partition;

pub mod role;
pub use role::{Coordinator, Role, Worker};

pub mod serial_comm;
pub use serial_comm::SerialComm;

#[cfg(feature = "rayon")]
pub mod rayon_comm;
#[cfg(feature = "rayon")]
pub use rayon_comm::RayonComm;

#[cfg(feature = "mpi")]
pub mod mpi_comm;
#[cfg(feature = "mpi")]
pub use mpi_comm::MpiComm;

pub trait Comm {
    fn rank(&self) -> usize;
    fn size(&self) -> usize;
    fn barrier(&self) -> Result<(), RegError>;

    /// Variable-count scatter: rank `r` receives `global[partition.range(r)]`.
    ///
    /// Only the root reads `global`; other ranks pass `None`.
    fn scatter_rows(
        &self,
        global: Option<&[f64]>,
        partition: &Partition,
        root: usize,
    ) -> Result<Vec<f64>, RegError>;

    /// Element-wise sum of `local` over all ranks, delivered to `root` only.
    fn reduce_sum(&self, local: &[f64], root: usize) -> Result<Option<Vec<f64>>, RegError>;

    /// Overwrite `buf` on every rank with the root's contents.
    fn broadcast(&self, buf: &mut [f64], root: usize) -> Result<(), RegError>;
}

pub(crate) fn check_root(size: usize, root: usize) -> Result<(), RegError> {
    if root >= size {
        return Err(RegError::Precondition(format!(
            "root rank {root} outside group of {size}"
        )));
    }
    Ok(())
}

pub(crate) fn check_scatter(
    global: Option<&[f64]>,
    partition: &Partition,
    size: usize,
    is_root: bool,
) -> Result<(), RegError> {
    if partition.parts() != size {
        return Err(RegError::Precondition(format!(
            "partition has {} parts for a group of {size}",
            partition.parts()
        )));
    }
    if is_root {
        match global {
            Some(g) if g.len() == partition.total() => {}
            Some(g) => {
                return Err(RegError::Precondition(format!(
                    "scatter source has {} elements, partition covers {}",
                    g.len(),
                    partition.total()
                )));
            }
            None => {
                return Err(RegError::Precondition("root must supply scatter source".into()));
            }
        }
    }
    Ok(())
}
