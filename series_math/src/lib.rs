//! # Series Math
//!
//! Numeric kernels used by the walk-forward forecaster.
//! This crate provides classical additive decomposition, a centered moving
//! average, regression trees with gradient boosting, and ordinary least squares.

use thiserror::Error;

pub mod boosting;
pub mod decomposition;
pub mod moving_averages;
pub mod ols;
pub mod tree;

pub use boosting::{BoostingParams, GradientBoostedTrees};
pub use decomposition::{decompose_additive, BoundaryPolicy, Decomposition};
pub use ols::LeastSquaresFit;

/// Errors that can occur in series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Check that every row has `width` finite columns and that targets line up.
pub(crate) fn validate_design(rows: &[Vec<f64>], targets: &[f64]) -> Result<usize> {
    if rows.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot fit on an empty training set".to_string(),
        ));
    }
    if rows.len() != targets.len() {
        return Err(MathError::InvalidInput(format!(
            "Feature rows ({}) and targets ({}) differ in length",
            rows.len(),
            targets.len()
        )));
    }

    let width = rows[0].len();
    if width == 0 {
        return Err(MathError::InvalidInput(
            "Feature rows must have at least one column".to_string(),
        ));
    }

    for (i, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(MathError::InvalidInput(format!(
                "Row {} has {} features, expected {}",
                i,
                row.len(),
                width
            )));
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(format!(
                "Row {} contains a non-finite feature",
                i
            )));
        }
    }

    if let Some(i) = targets.iter().position(|t| !t.is_finite()) {
        return Err(MathError::InvalidInput(format!(
            "Target {} is not finite",
            i
        )));
    }

    Ok(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_design_accepts_rectangular_rows() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        assert_eq!(validate_design(&rows, &[1.0, 2.0]).unwrap(), 2);
    }

    #[test]
    fn test_validate_design_rejects_ragged_and_nan() {
        let ragged = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(validate_design(&ragged, &[1.0, 2.0]).is_err());

        let nan = vec![vec![1.0, f64::NAN]];
        assert!(validate_design(&nan, &[1.0]).is_err());

        assert!(matches!(
            validate_design(&[], &[]),
            Err(MathError::InsufficientData(_))
        ));
    }
}
