//! Regression models retrained by the walk-forward loop

use crate::components::FeatureTriple;
use crate::error::Result;
use crate::training::TrainingSet;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Model fitted on a training set
pub trait FittedRegressor: Debug {
    /// Predict the target for one feature triple
    fn predict(&self, features: &FeatureTriple) -> Result<f64>;

    /// Number of rows the model was fit on
    fn training_rows(&self) -> usize;

    /// Last date in the data the model was fit on
    fn trained_through(&self) -> Option<NaiveDate>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Regression model that can be fit on a training set
pub trait Regressor: Debug + Clone {
    /// The type of fitted model produced
    type Fitted: FittedRegressor;

    /// Fit the model on every row of the training set
    fn fit(&self, data: &TrainingSet) -> Result<Self::Fitted>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Which regressor the pipeline retrains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    #[default]
    GradientBoosting,
    Linear,
}

pub mod gradient_boosting;
pub mod linear;

pub use gradient_boosting::{FittedGradientBoosting, GradientBoosting};
pub use linear::{FittedLinearRegression, LinearRegression};
