//! Linear regression on the decomposition features

use crate::components::FeatureTriple;
use crate::error::{ForecastError, Result};
use crate::models::{FittedRegressor, Regressor};
use crate::training::TrainingSet;
use chrono::NaiveDate;
use series_math::LeastSquaresFit;

/// Ordinary least squares regressor with intercept
#[derive(Debug, Clone)]
pub struct LinearRegression {
    name: String,
}

/// Fitted linear regressor
#[derive(Debug, Clone)]
pub struct FittedLinearRegression {
    name: String,
    fit: LeastSquaresFit,
    training_rows: usize,
    trained_through: Option<NaiveDate>,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self {
            name: "Linear Regression".to_string(),
        }
    }
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl FittedLinearRegression {
    /// Intercept and coefficients (trend, seasonal, residual)
    pub fn coefficients(&self) -> (f64, &[f64]) {
        (self.fit.intercept(), self.fit.coefficients())
    }
}

impl Regressor for LinearRegression {
    type Fitted = FittedLinearRegression;

    fn fit(&self, data: &TrainingSet) -> Result<Self::Fitted> {
        let (rows, targets) = data.design();
        let fit = LeastSquaresFit::fit(&rows, &targets)
            .map_err(|e| ForecastError::ModelError(format!("{}: {}", self.name, e)))?;

        Ok(FittedLinearRegression {
            name: self.name.clone(),
            fit,
            training_rows: data.len(),
            trained_through: data.last_date(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedRegressor for FittedLinearRegression {
    fn predict(&self, features: &FeatureTriple) -> Result<f64> {
        if !features.is_finite() {
            return Err(ForecastError::ModelError(format!(
                "{}: cannot predict from non-finite features",
                self.name
            )));
        }
        self.fit
            .predict(&features.to_row())
            .map_err(|e| ForecastError::ModelError(format!("{}: {}", self.name, e)))
    }

    fn training_rows(&self) -> usize {
        self.training_rows
    }

    fn trained_through(&self) -> Option<NaiveDate> {
        self.trained_through
    }

    fn name(&self) -> &str {
        &self.name
    }
}
