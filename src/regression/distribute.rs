//! Row distribution from the coordinator to every participant.
//!
//! Rows are split with [`Partition::rows`]; `y` is scattered with that
//! partition and `X` with the same partition scaled by the feature count, so
//! each rank receives whole rows. The coordinator's dataset is only read.

use super::{Dataset, LocalShard, ProblemShape};
use crate::error::RegError;
use crate::parallel::{Comm, Coordinator, Partition, Worker};
use log::{debug, warn};

/// `(rows, elements)` partitions for a group of `size` over `shape`.
pub fn partitions(shape: ProblemShape, size: usize) -> Result<(Partition, Partition), RegError> {
    let rows = Partition::rows(shape.samples, size)?;
    let elements = rows.scaled(shape.features)?;
    Ok((rows, elements))
}

/// Coordinator side: scatter `data` and keep the coordinator's own slice.
pub fn scatter<C: Comm>(coord: &Coordinator<'_, C>, data: &Dataset<'_>) -> Result<LocalShard, RegError> {
    let shape = data.shape();
    let (rows, elements) = partitions(shape, coord.size())?;
    if shape.samples < coord.size() {
        warn!(
            "{} samples over {} ranks leaves {} ranks without rows",
            shape.samples,
            coord.size(),
            coord.size() - shape.samples
        );
    }
    let x = coord.scatter(data.x(), &elements)?;
    let y = coord.scatter(data.y(), &rows)?;
    let rank = coord.rank();
    debug!("coordinator keeps rows {:?}", rows.range(rank));
    LocalShard::new(rows.offset(rank), x, y, shape.features)
}

/// Worker side: receive this rank's rows.
pub fn receive<C: Comm>(worker: &Worker<'_, C>, shape: ProblemShape) -> Result<LocalShard, RegError> {
    let (rows, elements) = partitions(shape, worker.size())?;
    let x = worker.receive(&elements)?;
    let y = worker.receive(&rows)?;
    let rank = worker.rank();
    debug!("rank {rank} received rows {:?}", rows.range(rank));
    LocalShard::new(rows.offset(rank), x, y, shape.features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parallel::{Role, SerialComm};

    #[test]
    fn serial_scatter_keeps_everything() {
        let shape = ProblemShape::new(3, 2).unwrap();
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [7.0, 8.0, 9.0];
        let data = Dataset::new(&x, &y, shape).unwrap();
        let comm = SerialComm::new();
        let Role::Coordinator(coord) = Role::of(&comm).unwrap() else {
            panic!("single rank must coordinate");
        };
        let shard = scatter(&coord, &data).unwrap();
        assert_eq!(shard.offset, 0);
        assert_eq!(shard.rows().x(), &x[..]);
        assert_eq!(shard.rows().y(), &y[..]);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn slices_are_bit_identical_to_source_rows() {
        use crate::parallel::RayonComm;
        let shape = ProblemShape::new(11, 3).unwrap();
        let x: Vec<f64> = (0..33).map(|i| (i as f64).sin()).collect();
        let y: Vec<f64> = (0..11).map(|i| (i as f64).cos()).collect();
        let shards = RayonComm::run(4, |comm| match Role::of(comm).unwrap() {
            Role::Coordinator(coord) => {
                let data = Dataset::new(&x, &y, shape).unwrap();
                scatter(&coord, &data).unwrap()
            }
            Role::Worker(worker) => receive(&worker, shape).unwrap(),
        })
        .unwrap();
        let rows = Partition::rows(11, 4).unwrap();
        for (rank, shard) in shards.iter().enumerate() {
            let r = rows.range(rank);
            assert_eq!(shard.offset, r.start);
            assert_eq!(shard.rows().y(), &y[r.clone()]);
            assert_eq!(shard.rows().x(), &x[r.start * 3..r.end * 3]);
        }
    }
}
