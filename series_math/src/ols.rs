//! Ordinary least squares with an intercept
//!
//! Solves the normal equations `(X'X) b = X'y` by Gaussian elimination with
//! partial pivoting. Features are centered first, which keeps the system
//! well conditioned when trend values are large.

use crate::{validate_design, MathError, Result};

const PIVOT_TOLERANCE: f64 = 1e-10;

/// Fitted linear model `y = intercept + sum(coef_j * x_j)`
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquaresFit {
    intercept: f64,
    coefficients: Vec<f64>,
}

impl LeastSquaresFit {
    /// Fit on rectangular, finite rows.
    ///
    /// A rank-deficient design (e.g. a constant feature, or fewer rows than
    /// coefficients) is reported as a calculation error.
    pub fn fit(rows: &[Vec<f64>], targets: &[f64]) -> Result<Self> {
        let width = validate_design(rows, targets)?;
        let n = rows.len();
        if n <= width {
            return Err(MathError::InsufficientData(format!(
                "Least squares with {} features needs more than {} rows, have {}",
                width, width, n
            )));
        }

        let means: Vec<f64> = (0..width)
            .map(|j| rows.iter().map(|r| r[j]).sum::<f64>() / n as f64)
            .collect();
        let y_mean = targets.iter().sum::<f64>() / n as f64;

        // centered normal equations, one row per coefficient plus the rhs
        let mut system = vec![vec![0.0; width + 1]; width];
        for (row, y) in rows.iter().zip(targets.iter()) {
            for a in 0..width {
                let xa = row[a] - means[a];
                for b in 0..width {
                    system[a][b] += xa * (row[b] - means[b]);
                }
                system[a][width] += xa * (y - y_mean);
            }
        }

        let coefficients = solve(system)?;
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(means.iter())
                .map(|(c, m)| c * m)
                .sum::<f64>();

        Ok(Self {
            intercept,
            coefficients,
        })
    }

    /// Predict one row
    pub fn predict(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            return Err(MathError::InvalidInput(format!(
                "Expected {} features, got {}",
                self.coefficients.len(),
                row.len()
            )));
        }

        let value = self.intercept
            + self
                .coefficients
                .iter()
                .zip(row.iter())
                .map(|(c, x)| c * x)
                .sum::<f64>();

        if !value.is_finite() {
            return Err(MathError::CalculationError(
                "Linear prediction is not finite".to_string(),
            ));
        }
        Ok(value)
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
}

/// Solve an augmented `k x (k + 1)` system in place
fn solve(mut m: Vec<Vec<f64>>) -> Result<Vec<f64>> {
    let k = m.len();
    let scale = m
        .iter()
        .flat_map(|r| r[..k].iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()))
        .max(1.0);

    for col in 0..k {
        let pivot = (col..k)
            .max_by(|&a, &b| m[a][col].abs().total_cmp(&m[b][col].abs()))
            .unwrap_or(col);
        if m[pivot][col].abs() <= PIVOT_TOLERANCE * scale {
            return Err(MathError::CalculationError(
                "Singular design matrix: features are collinear or constant".to_string(),
            ));
        }
        m.swap(col, pivot);

        for r in col + 1..k {
            let factor = m[r][col] / m[col][col];
            for c in col..=k {
                m[r][c] -= factor * m[col][c];
            }
        }
    }

    let mut x = vec![0.0; k];
    for row in (0..k).rev() {
        let tail: f64 = (row + 1..k).map(|c| m[row][c] * x[c]).sum();
        x[row] = (m[row][k] - tail) / m[row][row];
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_recovers_exact_plane() {
        let rows: Vec<Vec<f64>> = (0..30)
            .map(|i| vec![i as f64, ((i * 7) % 11) as f64, ((i * 3) % 5) as f64])
            .collect();
        let targets: Vec<f64> = rows
            .iter()
            .map(|r| 4.0 + 2.0 * r[0] - 0.5 * r[1] + 3.0 * r[2])
            .collect();

        let fit = LeastSquaresFit::fit(&rows, &targets).unwrap();
        assert_relative_eq!(fit.intercept(), 4.0, epsilon = 1e-8);
        assert_relative_eq!(fit.coefficients()[0], 2.0, epsilon = 1e-8);
        assert_relative_eq!(fit.coefficients()[1], -0.5, epsilon = 1e-8);
        assert_relative_eq!(fit.coefficients()[2], 3.0, epsilon = 1e-8);
        assert_relative_eq!(fit.predict(&[1.0, 1.0, 1.0]).unwrap(), 8.5, epsilon = 1e-8);
    }

    #[test]
    fn test_constant_feature_is_singular() {
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64, 1.0]).collect();
        let targets: Vec<f64> = (0..10).map(|i| i as f64).collect();

        assert!(matches!(
            LeastSquaresFit::fit(&rows, &targets),
            Err(MathError::CalculationError(_))
        ));
    }

    #[test]
    fn test_too_few_rows() {
        let rows = vec![vec![1.0, 2.0], vec![2.0, 1.0]];
        assert!(matches!(
            LeastSquaresFit::fit(&rows, &[1.0, 2.0]),
            Err(MathError::InsufficientData(_))
        ));
    }
}
