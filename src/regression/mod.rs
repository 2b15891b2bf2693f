//! Linear regression estimators over a worker group.
//!
//! - [`distribute`]: row-partitioned scatter of `X` and `y` from the coordinator.
//! - [`aggregate`]: per-slice normal equations and gradients.
//! - [`ols`]: one-shot normal-equations pipeline.
//! - [`gd`]: fixed-budget gradient descent loop.
//!
//! `X` is always a flat row-major `n × d` array and `y` has one entry per row.

use crate::error::RegError;

pub mod aggregate;
pub mod distribute;
pub mod gd;
pub mod ols;

pub use aggregate::NormalEquations;
pub use gd::{gd_serial, GdEngine};
pub use ols::{ols_serial, OlsEngine};

/// Global problem size. Every participant must be handed the same value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProblemShape {
    pub samples: usize,
    pub features: usize,
}

impl ProblemShape {
    /// Validates `samples >= 1`, `features >= 1` and `features <= samples`
    /// (fewer rows than columns makes `XᵀX` rank deficient).
    pub fn new(samples: usize, features: usize) -> Result<Self, RegError> {
        if samples < 1 {
            return Err(RegError::Precondition("need at least one sample".into()));
        }
        if features < 1 {
            return Err(RegError::Precondition("need at least one feature".into()));
        }
        if features > samples {
            return Err(RegError::Precondition(format!(
                "{features} features exceed {samples} samples"
            )));
        }
        let shape = ProblemShape { samples, features };
        shape.elements()?;
        Ok(shape)
    }

    /// Number of values in `X`, `samples * features`.
    pub fn elements(&self) -> Result<usize, RegError> {
        self.samples.checked_mul(self.features).ok_or_else(|| {
            RegError::Precondition(format!(
                "{} samples x {} features overflows the element count",
                self.samples, self.features
            ))
        })
    }
}

/// Borrowed view of a block of rows: `x` is `rows × features`, row-major.
#[derive(Clone, Copy, Debug)]
pub struct Rows<'a> {
    x: &'a [f64],
    y: &'a [f64],
    features: usize,
}

impl<'a> Rows<'a> {
    pub fn new(x: &'a [f64], y: &'a [f64], features: usize) -> Result<Self, RegError> {
        if features < 1 {
            return Err(RegError::Precondition("need at least one feature".into()));
        }
        if y.len().checked_mul(features) != Some(x.len()) {
            return Err(RegError::Precondition(format!(
                "X has {} values, expected {} rows x {features} features",
                x.len(),
                y.len()
            )));
        }
        Ok(Rows { x, y, features })
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn features(&self) -> usize {
        self.features
    }

    pub fn x(&self) -> &'a [f64] {
        self.x
    }

    pub fn y(&self) -> &'a [f64] {
        self.y
    }

    /// `(x_row, y)` pairs in row order.
    pub fn iter(self) -> impl Iterator<Item = (&'a [f64], f64)> + 'a {
        self.x.chunks_exact(self.features).zip(self.y.iter().copied())
    }
}

/// The full dataset as held by the coordinator. Never modified.
#[derive(Clone, Copy, Debug)]
pub struct Dataset<'a> {
    rows: Rows<'a>,
    shape: ProblemShape,
}

impl<'a> Dataset<'a> {
    pub fn new(x: &'a [f64], y: &'a [f64], shape: ProblemShape) -> Result<Self, RegError> {
        if y.len() != shape.samples {
            return Err(RegError::Precondition(format!(
                "y has {} entries for {} samples",
                y.len(),
                shape.samples
            )));
        }
        let rows = Rows::new(x, y, shape.features)?;
        Ok(Dataset { rows, shape })
    }

    pub fn shape(&self) -> ProblemShape {
        self.shape
    }

    pub fn rows(&self) -> Rows<'a> {
        self.rows
    }

    pub fn x(&self) -> &'a [f64] {
        self.rows.x
    }

    pub fn y(&self) -> &'a [f64] {
        self.rows.y
    }
}

/// One participant's owned copy of its rows after distribution.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalShard {
    /// First global row index of this slice.
    pub offset: usize,
    x: Vec<f64>,
    y: Vec<f64>,
    features: usize,
}

impl LocalShard {
    pub fn new(offset: usize, x: Vec<f64>, y: Vec<f64>, features: usize) -> Result<Self, RegError> {
        Rows::new(&x, &y, features)?;
        Ok(LocalShard { offset, x, y, features })
    }

    pub fn rows(&self) -> Rows<'_> {
        Rows { x: &self.x, y: &self.y, features: self.features }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_preconditions() {
        assert!(ProblemShape::new(10, 3).is_ok());
        assert!(ProblemShape::new(5, 5).is_ok());
        assert!(ProblemShape::new(0, 1).is_err());
        assert!(ProblemShape::new(10, 0).is_err());
        assert!(ProblemShape::new(3, 4).is_err());
    }

    #[test]
    fn shape_rejects_overflowing_element_count() {
        let err = ProblemShape::new(1 << 33, 1 << 31).unwrap_err();
        assert!(matches!(err, RegError::Precondition(_)));
        let unchecked = ProblemShape { samples: usize::MAX, features: 2 };
        assert!(unchecked.elements().is_err());
        assert_eq!(ProblemShape::new(6, 3).unwrap().elements().unwrap(), 18);
    }

    #[test]
    fn dataset_checks_buffer_lengths() {
        let shape = ProblemShape::new(2, 2).unwrap();
        let x = [1.0, 2.0, 3.0, 4.0];
        assert!(Dataset::new(&x, &[1.0, 2.0], shape).is_ok());
        assert!(Dataset::new(&x, &[1.0], shape).is_err());
        assert!(Dataset::new(&x[..3], &[1.0, 2.0], shape).is_err());
    }

    #[test]
    fn rows_iterate_in_order() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [7.0, 8.0, 9.0];
        let rows = Rows::new(&x, &y, 2).unwrap();
        let collected: Vec<_> = rows.iter().collect();
        assert_eq!(collected[1], (&[3.0, 4.0][..], 8.0));
        assert_eq!(rows.len(), 3);
    }
}
