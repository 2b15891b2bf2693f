//! Fit quality measures.

use crate::error::RegError;
use crate::regression::Dataset;

/// Mean squared error between two equal-length vectors.
pub fn mse(y_true: &[f64], y_pred: &[f64]) -> f64 {
    debug_assert_eq!(y_true.len(), y_pred.len());
    if y_true.is_empty() {
        return 0.0;
    }
    let sum: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p) * (t - p))
        .sum();
    sum / y_true.len() as f64
}

/// ‖a − b‖₂.
pub fn vector_diff_norm(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// `X · beta` for every row of `data`.
pub fn predict(data: &Dataset<'_>, beta: &[f64]) -> Result<Vec<f64>, RegError> {
    let d = data.shape().features;
    if beta.len() != d {
        return Err(RegError::Precondition(format!(
            "beta has {} entries for {d} features",
            beta.len()
        )));
    }
    Ok(data
        .rows()
        .iter()
        .map(|(row, _)| row.iter().zip(beta).map(|(x, b)| x * b).sum::<f64>())
        .collect())
}

/// Mean squared residual of `beta` on `data`.
pub fn residual_mse(data: &Dataset<'_>, beta: &[f64]) -> Result<f64, RegError> {
    let pred = predict(data, beta)?;
    Ok(mse(data.y(), &pred))
}
