//! Gradient boosted trees over the decomposition features

use crate::components::FeatureTriple;
use crate::error::{ForecastError, Result};
use crate::models::{FittedRegressor, Regressor};
use crate::training::TrainingSet;
use chrono::NaiveDate;
use series_math::{BoostingParams, GradientBoostedTrees};

/// Gradient boosting regressor
#[derive(Debug, Clone)]
pub struct GradientBoosting {
    /// Name of the model
    name: String,
    params: BoostingParams,
}

/// Fitted gradient boosting regressor
#[derive(Debug, Clone)]
pub struct FittedGradientBoosting {
    name: String,
    ensemble: GradientBoostedTrees,
    training_rows: usize,
    trained_through: Option<NaiveDate>,
}

impl GradientBoosting {
    /// Create a new gradient boosting model
    pub fn new(params: BoostingParams) -> Result<Self> {
        params
            .validate()
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;

        Ok(Self {
            name: format!(
                "Gradient Boosting (trees={}, depth={}, rate={})",
                params.n_estimators, params.max_depth, params.learning_rate
            ),
            params,
        })
    }

    pub fn params(&self) -> &BoostingParams {
        &self.params
    }
}

impl Default for GradientBoosting {
    fn default() -> Self {
        Self {
            name: "Gradient Boosting (trees=100, depth=3, rate=0.1)".to_string(),
            params: BoostingParams::default(),
        }
    }
}

impl Regressor for GradientBoosting {
    type Fitted = FittedGradientBoosting;

    fn fit(&self, data: &TrainingSet) -> Result<Self::Fitted> {
        let (rows, targets) = data.design();
        let ensemble = GradientBoostedTrees::fit(&rows, &targets, &self.params)
            .map_err(|e| ForecastError::ModelError(format!("{}: {}", self.name, e)))?;

        Ok(FittedGradientBoosting {
            name: self.name.clone(),
            ensemble,
            training_rows: data.len(),
            trained_through: data.last_date(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedRegressor for FittedGradientBoosting {
    fn predict(&self, features: &FeatureTriple) -> Result<f64> {
        self.ensemble
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
