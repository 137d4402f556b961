//! Classical additive decomposition
//!
//! Splits a series into `trend + seasonal + residual`:
//! - trend: centered moving average over one period
//! - seasonal: per-phase mean of the detrended series, centered to sum to zero
//! - residual: whatever is left
//!
//! The moving average leaves the first and last half-window of the trend
//! undefined. [`BoundaryPolicy`] decides what happens there.

use crate::moving_averages::centered_moving_average;
use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// How undefined trend values at the series edges are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Extend the trend with a least-squares line through the `period`
    /// nearest defined points on each side. All components end up defined.
    #[default]
    Extrapolate,
    /// Leave the edges as `NaN` in trend and residual.
    Propagate,
}

/// Additive decomposition aligned index-for-index with the input series
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<f64>,
    period: usize,
}

impl Decomposition {
    /// Number of observations covered
    pub fn len(&self) -> usize {
        self.trend.len()
    }

    /// Whether the decomposition is empty
    pub fn is_empty(&self) -> bool {
        self.trend.is_empty()
    }

    /// Seasonal period used
    pub fn period(&self) -> usize {
        self.period
    }

    /// Components at position `i`, if all three are defined
    pub fn components_at(&self, i: usize) -> Option<(f64, f64, f64)> {
        let t = *self.trend.get(i)?;
        let s = *self.seasonal.get(i)?;
        let r = *self.residual.get(i)?;
        if t.is_finite() && s.is_finite() && r.is_finite() {
            Some((t, s, r))
        } else {
            None
        }
    }

    /// The `period` seasonal factors, indexed by phase `i % period`
    pub fn seasonal_factors(&self) -> &[f64] {
        &self.seasonal[..self.period.min(self.seasonal.len())]
    }
}

/// Decompose `values` additively with the given seasonal `period`.
///
/// Requires at least two full periods of finite observations.
pub fn decompose_additive(
    values: &[f64],
    period: usize,
    boundary: BoundaryPolicy,
) -> Result<Decomposition> {
    if period < 2 {
        return Err(MathError::InvalidInput(
            "Seasonal period must be at least 2".to_string(),
        ));
    }
    if values.len() < 2 * period {
        return Err(MathError::InsufficientData(format!(
            "Decomposition with period {} needs at least {} observations, have {}",
            period,
            2 * period,
            values.len()
        )));
    }
    if let Some(i) = values.iter().position(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(format!(
            "Observation {} is not finite",
            i
        )));
    }

    let mut trend = centered_moving_average(values, period)?;
    if boundary == BoundaryPolicy::Extrapolate {
        extrapolate_edges(&mut trend, period)?;
    }

    let detrended: Vec<f64> = values
        .iter()
        .zip(trend.iter())
        .map(|(v, t)| v - t)
        .collect();

    let factors = seasonal_factors(&detrended, period)?;
    let seasonal: Vec<f64> = (0..values.len()).map(|i| factors[i % period]).collect();

    let residual: Vec<f64> = detrended
        .iter()
        .zip(seasonal.iter())
        .map(|(d, s)| d - s)
        .collect();

    Ok(Decomposition {
        trend,
        seasonal,
        residual,
        period,
    })
}

/// Mean of each phase over the defined entries, centered to zero sum
fn seasonal_factors(detrended: &[f64], period: usize) -> Result<Vec<f64>> {
    let mut factors = Vec::with_capacity(period);
    for phase in 0..period {
        let (sum, count) = detrended
            .iter()
            .skip(phase)
            .step_by(period)
            .filter(|v| v.is_finite())
            .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));

        if count == 0 {
            return Err(MathError::CalculationError(format!(
                "No defined detrended values for seasonal phase {}",
                phase
            )));
        }
        factors.push(sum / count as f64);
    }

    let mean = factors.iter().sum::<f64>() / period as f64;
    for f in factors.iter_mut() {
        *f -= mean;
    }
    Ok(factors)
}

/// Fill leading and trailing `NaN`s of `trend` with fitted lines
fn extrapolate_edges(trend: &mut [f64], npoints: usize) -> Result<()> {
    let front = trend.iter().position(|v| v.is_finite());
    let back = trend.iter().rposition(|v| v.is_finite());
    let (front, back) = match (front, back) {
        (Some(f), Some(b)) => (f, b),
        _ => {
            return Err(MathError::CalculationError(
                "Trend has no defined values to extrapolate from".to_string(),
            ))
        }
    };

    let front_last = (front + npoints).min(back + 1);
    let (slope, intercept) = fit_line(front, &trend[front..front_last]);
    for (i, slot) in trend.iter_mut().enumerate().take(front) {
        *slot = slope * i as f64 + intercept;
    }

    let back_first = (back + 1).saturating_sub(npoints).max(front);
    let (slope, intercept) = fit_line(back_first, &trend[back_first..=back]);
    for (i, slot) in trend.iter_mut().enumerate().skip(back + 1) {
        *slot = slope * i as f64 + intercept;
    }

    Ok(())
}

/// Least-squares line through `(start + i, ys[i])`
fn fit_line(start: usize, ys: &[f64]) -> (f64, f64) {
    let n = ys.len() as f64;
    let xs: Vec<f64> = (0..ys.len()).map(|i| (start + i) as f64).collect();
    let x_mean = xs.iter().sum::<f64>() / n;
    let y_mean = ys.iter().sum::<f64>() / n;

    let sxx: f64 = xs.iter().map(|x| (x - x_mean).powi(2)).sum();
    if sxx == 0.0 {
        return (0.0, y_mean);
    }
    let sxy: f64 = xs
        .iter()
        .zip(ys.iter())
        .map(|(x, y)| (x - x_mean) * (y - y_mean))
        .sum();

    let slope = sxy / sxx;
    (slope, y_mean - slope * x_mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seasonal_series(n: usize, period: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let phase = (i % period) as f64;
                100.0 + 0.5 * i as f64 + (phase * std::f64::consts::TAU / period as f64).sin() * 10.0
            })
            .collect()
    }

    #[test]
    fn test_components_sum_to_series() {
        let values = seasonal_series(120, 12);
        let decomposition = decompose_additive(&values, 12, BoundaryPolicy::Extrapolate).unwrap();

        assert_eq!(decomposition.len(), values.len());
        for (i, value) in values.iter().enumerate() {
            let (t, s, r) = decomposition.components_at(i).unwrap();
            assert_relative_eq!(t + s + r, *value, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_seasonal_factors_are_centered() {
        let values = seasonal_series(96, 12);
        let decomposition = decompose_additive(&values, 12, BoundaryPolicy::Propagate).unwrap();

        let total: f64 = decomposition.seasonal_factors().iter().sum();
        assert_relative_eq!(total, 0.0, epsilon = 1e-9);
        assert_eq!(decomposition.seasonal_factors().len(), 12);
    }

    #[test]
    fn test_propagate_leaves_edges_undefined() {
        let values = seasonal_series(48, 12);
        let decomposition = decompose_additive(&values, 12, BoundaryPolicy::Propagate).unwrap();

        assert!(decomposition.components_at(0).is_none());
        assert!(decomposition.components_at(5).is_none());
        assert!(decomposition.components_at(6).is_some());
        assert!(decomposition.components_at(41).is_some());
        assert!(decomposition.components_at(42).is_none());
        assert!(decomposition.components_at(47).is_none());
    }

    #[test]
    fn test_extrapolate_follows_linear_trend() {
        let values: Vec<f64> = (0..36).map(|i| 3.0 * i as f64).collect();
        let decomposition = decompose_additive(&values, 12, BoundaryPolicy::Extrapolate).unwrap();

        for (i, t) in decomposition.trend.iter().enumerate() {
            assert_relative_eq!(*t, 3.0 * i as f64, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_deterministic() {
        let values = seasonal_series(200, 12);
        let a = decompose_additive(&values, 12, BoundaryPolicy::Extrapolate).unwrap();
        let b = decompose_additive(&values, 12, BoundaryPolicy::Extrapolate).unwrap();

        let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a.trend), bits(&b.trend));
        assert_eq!(bits(&a.seasonal), bits(&b.seasonal));
        assert_eq!(bits(&a.residual), bits(&b.residual));
    }

    #[test]
    fn test_requires_two_periods() {
        let values = seasonal_series(23, 12);
        assert!(matches!(
            decompose_additive(&values, 12, BoundaryPolicy::Extrapolate),
            Err(MathError::InsufficientData(_))
        ));
        assert!(decompose_additive(&seasonal_series(24, 12), 12, BoundaryPolicy::Extrapolate).is_ok());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            decompose_additive(&[1.0; 10], 1, BoundaryPolicy::Extrapolate),
            Err(MathError::InvalidInput(_))
        ));

        let mut values = seasonal_series(30, 12);
        values[4] = f64::NAN;
        assert!(matches!(
            decompose_additive(&values, 12, BoundaryPolicy::Extrapolate),
            Err(MathError::InvalidInput(_))
        ));
    }
}
