//! Centered moving averages used to extract the trend of a seasonal series
//!
//! Even periods use the `2 x p` filter (half weights on the two outer points)
//! so the window stays centered on an observation; odd periods use a plain
//! `p`-point mean.

use crate::{MathError, Result};

/// Filter weights for a centered moving average over `period` observations.
pub fn centered_weights(period: usize) -> Result<Vec<f64>> {
    if period < 2 {
        return Err(MathError::InvalidInput(
            "Period must be at least 2".to_string(),
        ));
    }

    let p = period as f64;
    if period % 2 == 0 {
        let mut weights = vec![1.0 / p; period + 1];
        weights[0] = 0.5 / p;
        weights[period] = 0.5 / p;
        Ok(weights)
    } else {
        Ok(vec![1.0 / p; period])
    }
}

/// Centered moving average of `values`.
///
/// The output has the same length as the input. The first and last
/// `weights.len() / 2` entries cannot be computed and are `NaN`.
pub fn centered_moving_average(values: &[f64], period: usize) -> Result<Vec<f64>> {
    let weights = centered_weights(period)?;
    let half = weights.len() / 2;

    if values.len() < weights.len() {
        return Err(MathError::InsufficientData(format!(
            "Centered average of period {} needs {} values, have {}",
            period,
            weights.len(),
            values.len()
        )));
    }

    let mut out = vec![f64::NAN; values.len()];
    for (i, slot) in out
        .iter_mut()
        .enumerate()
        .skip(half)
        .take(values.len() - 2 * half)
    {
        let window = &values[i - half..=i + half];
        *slot = window
            .iter()
            .zip(weights.iter())
            .map(|(v, w)| v * w)
            .sum();
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_even_period_weights() {
        let weights = centered_weights(4).unwrap();
        assert_eq!(weights.len(), 5);
        assert_relative_eq!(weights[0], 0.125);
        assert_relative_eq!(weights[2], 0.25);
        assert_relative_eq!(weights.iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn test_odd_period_weights() {
        let weights = centered_weights(3).unwrap();
        assert_eq!(weights.len(), 3);
        assert_relative_eq!(weights.iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn test_linear_series_is_reproduced() {
        let values: Vec<f64> = (0..20).map(|i| 2.0 * i as f64 + 1.0).collect();
        let trend = centered_moving_average(&values, 4).unwrap();

        assert_eq!(trend.len(), values.len());
        assert!(trend[..2].iter().all(|v| v.is_nan()));
        assert!(trend[18..].iter().all(|v| v.is_nan()));
        for i in 2..18 {
            assert_relative_eq!(trend[i], values[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_too_short_series() {
        assert!(matches!(
            centered_moving_average(&[1.0, 2.0, 3.0], 4),
            Err(MathError::InsufficientData(_))
        ));
        assert!(centered_weights(1).is_err());
    }
}
