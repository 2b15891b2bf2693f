//! Local aggregation over one participant's rows.
//!
//! Both aggregates are plain sums over rows, so summing them across disjoint
//! slices reproduces the aggregate of the whole dataset.

use super::Rows;
use crate::error::{zeroed, RegError};

/// `XᵀX` (row-major `d × d`) and `Xᵀy` (length `d`) for a block of rows.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalEquations {
    pub xtx: Vec<f64>,
    pub xty: Vec<f64>,
}

/// Accumulate the normal equations, rows outermost.
pub fn normal_equations(rows: Rows<'_>) -> Result<NormalEquations, RegError> {
    let d = rows.features();
    let len = d
        .checked_mul(d)
        .ok_or(RegError::ResourceExhaustion { what: "local XtX", len: usize::MAX })?;
    let mut xtx = zeroed("local XtX", len)?;
    let mut xty = zeroed("local Xty", d)?;
    for (row, yi) in rows.iter() {
        for (i, &xi) in row.iter().enumerate() {
            let out = &mut xtx[i * d..(i + 1) * d];
            for (acc, &xj) in out.iter_mut().zip(row) {
                *acc += xi * xj;
            }
            xty[i] += xi * yi;
        }
    }
    Ok(NormalEquations { xtx, xty })
}

/// `Xᵀ(X·beta − y)` for a block of rows.
pub fn gradient(rows: Rows<'_>, beta: &[f64]) -> Result<Vec<f64>, RegError> {
    let d = rows.features();
    if beta.len() != d {
        return Err(RegError::Precondition(format!(
            "beta has {} entries for {d} features",
            beta.len()
        )));
    }
    let mut grad = zeroed("local gradient", d)?;
    for (row, yi) in rows.iter() {
        let pred: f64 = row.iter().zip(beta).map(|(x, b)| x * b).sum();
        let err = pred - yi;
        for (g, &xj) in grad.iter_mut().zip(row) {
            *g += xj * err;
        }
    }
    Ok(grad)
}
