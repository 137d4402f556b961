//! Utility functions for the walk_forecast crate

use crate::data::DailySeries;
use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};
use serde::Serialize;
use statrs::statistics::Statistics;

/// The `days` calendar dates following `cutoff`
pub fn horizon_after(cutoff: NaiveDate, days: usize) -> Result<Vec<NaiveDate>> {
    (1..=days as u64)
        .map(|offset| {
            cutoff.checked_add_days(Days::new(offset)).ok_or_else(|| {
                ForecastError::ValidationError(format!(
                    "Horizon of {} days after {} is out of range",
                    days, cutoff
                ))
            })
        })
        .collect()
}

/// Cutoff leaving exactly `horizon_days` calendar days at the end of `series`
pub fn default_cutoff(series: &DailySeries, horizon_days: usize) -> Result<NaiveDate> {
    cutoff_before(series.first_date(), series.last_date(), horizon_days)
}

/// Cutoff whose horizon ends on `end`, which must leave history from `first`
pub fn cutoff_before(first: NaiveDate, end: NaiveDate, horizon_days: usize) -> Result<NaiveDate> {
    let cutoff = end
        .checked_sub_days(Days::new(horizon_days as u64))
        .ok_or_else(|| {
            ForecastError::ValidationError("Cutoff date is out of range".to_string())
        })?;

    if cutoff < first {
        return Err(ForecastError::DataError(format!(
            "Series from {} to {} is shorter than the {}-day horizon",
            first, end, horizon_days
        )));
    }
    Ok(cutoff)
}

/// Calculate accuracy metrics for a forecast vs actual values
pub fn forecast_accuracy(forecast: &[f64], actual: &[f64]) -> Result<ForecastAccuracy> {
    if forecast.len() != actual.len() || forecast.is_empty() {
        return Err(ForecastError::ValidationError(
            "Forecast and actual values must have the same non-zero length".to_string(),
        ));
    }

    let n = forecast.len() as f64;

    // Calculate errors
    let errors: Vec<f64> = forecast
        .iter()
        .zip(actual.iter())
        .map(|(&f, &a)| a - f)
        .collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let mse = errors.iter().map(|e| e.powi(2)).sum::<f64>() / n;
    let rmse = mse.sqrt();

    // zero actuals are left out of the numerator but still count in n
    let mape = actual
        .iter()
        .zip(errors.iter())
        .filter(|(a, _)| **a != 0.0)
        .map(|(a, e)| (e.abs() / a.abs()) * 100.0)
        .sum::<f64>()
        / n;

    let smape = actual
        .iter()
        .zip(forecast.iter())
        .map(|(&a, &f)| {
            let abs_a = a.abs();
            let abs_f = f.abs();
            if abs_a + abs_f == 0.0 {
                0.0
            } else {
                200.0 * (a - f).abs() / (abs_a + abs_f)
            }
        })
        .sum::<f64>()
        / n;

    let bias = errors.iter().mean();
    let error_std_dev = if errors.len() > 1 {
        errors.iter().std_dev()
    } else {
        0.0
    };

    Ok(ForecastAccuracy {
        mae,
        mse,
        rmse,
        mape,
        smape,
        bias,
        error_std_dev,
    })
}

/// Forecast accuracy metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastAccuracy {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error
    pub mape: f64,
    /// Symmetric Mean Absolute Percentage Error
    pub smape: f64,
    /// Mean of `actual - forecast`
    pub bias: f64,
    /// Sample standard deviation of `actual - forecast`
    pub error_std_dev: f64,
}

impl std::fmt::Display for ForecastAccuracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Accuracy Metrics:")?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  MSE:   {:.4}", self.mse)?;
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        writeln!(f, "  MAPE:  {:.4}%", self.mape)?;
        writeln!(f, "  SMAPE: {:.4}%", self.smape)?;
        writeln!(f, "  Bias:  {:.4}", self.bias)?;
        writeln!(f, "  Error std dev: {:.4}", self.error_std_dev)?;
        Ok(())
    }
}
