// single-participant communication

use super::{check_root, check_scatter, Comm, Partition};
use crate::error::RegError;

/// A group of one. Every collective degenerates to a local copy.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialComm;

impl SerialComm {
    pub fn new() -> Self {
        SerialComm
    }
}

impl Comm for SerialComm {
    fn rank(&self) -> usize { 0 }
    fn size(&self) -> usize { 1 }
    fn barrier(&self) -> Result<(), RegError> { Ok(()) }

    fn scatter_rows(
        &self,
        global: Option<&[f64]>,
        partition: &Partition,
        root: usize,
    ) -> Result<Vec<f64>, RegError> {
        check_root(1, root)?;
        check_scatter(global, partition, 1, true)?;
        let global = global.unwrap_or_default();
        let mut out = crate::error::zeroed("scatter slice", global.len())?;
        out.copy_from_slice(global);
        Ok(out)
    }

    fn reduce_sum(&self, local: &[f64], root: usize) -> Result<Option<Vec<f64>>, RegError> {
        check_root(1, root)?;
        let mut out = crate::error::zeroed("reduction result", local.len())?;
        out.copy_from_slice(local);
        Ok(Some(out))
    }

    fn broadcast(&self, _buf: &mut [f64], root: usize) -> Result<(), RegError> {
        check_root(1, root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scatter_returns_whole_input() {
        let comm = SerialComm::new();
        let p = Partition::rows(3, 1).unwrap();
        let data = [1.0, 2.0, 3.0];
        assert_eq!(comm.scatter_rows(Some(&data), &p, 0).unwrap(), data.to_vec());
    }

    #[test]
    fn reduce_is_identity() {
        let comm = SerialComm::new();
        assert_eq!(comm.reduce_sum(&[4.0, 5.0], 0).unwrap(), Some(vec![4.0, 5.0]));
    }

    #[test]
    fn rejects_foreign_root() {
        let comm = SerialComm::new();
        assert!(comm.reduce_sum(&[1.0], 1).is_err());
    }
}
