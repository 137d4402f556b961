//! Run configuration

use crate::data::{DEFAULT_DATE_COLUMN, DEFAULT_TARGET_COLUMN};
use crate::error::{ForecastError, Result};
use crate::models::ModelKind;
use crate::walk_forward::MissingObservationPolicy;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use series_math::{BoostingParams, BoundaryPolicy};

/// Seasonal period of the decomposition
pub const SEASONAL_PERIOD: usize = 12;
/// Number of calendar days forecast after the cutoff
pub const HORIZON_DAYS: usize = 30;

/// Settings for one forecasting run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub date_column: String,
    pub target_column: String,
    pub period: usize,
    pub horizon_days: usize,
    /// Last date of the initial training set; defaults to the last
    /// observation minus the horizon
    pub cutoff: Option<NaiveDate>,
    pub boundary: BoundaryPolicy,
    pub on_missing: MissingObservationPolicy,
    pub model: ModelKind,
    pub boosting: BoostingParams,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            target_column: DEFAULT_TARGET_COLUMN.to_string(),
            period: SEASONAL_PERIOD,
            horizon_days: HORIZON_DAYS,
            cutoff: None,
            boundary: BoundaryPolicy::default(),
            on_missing: MissingObservationPolicy::default(),
            model: ModelKind::default(),
            boosting: BoostingParams::default(),
        }
    }
}

impl ForecastConfig {
    pub fn with_cutoff(mut self, cutoff: NaiveDate) -> Self {
        self.cutoff = Some(cutoff);
        self
    }

    pub fn with_period(mut self, period: usize) -> Self {
        self.period = period;
        self
    }

    pub fn with_horizon_days(mut self, days: usize) -> Self {
        self.horizon_days = days;
        self
    }

    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_missing_policy(mut self, policy: MissingObservationPolicy) -> Self {
        self.on_missing = policy;
        self
    }

    pub fn with_model(mut self, model: ModelKind) -> Self {
        self.model = model;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.boosting.seed = seed;
        self
    }

    pub fn with_boosting(mut self, params: BoostingParams) -> Self {
        self.boosting = params;
        self
    }

    /// Check that the settings describe a runnable pipeline
    pub fn validate(&self) -> Result<()> {
        if self.date_column.trim().is_empty() || self.target_column.trim().is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Column names must not be empty".to_string(),
            ));
        }
        if self.period < 2 {
            return Err(ForecastError::InvalidParameter(
                "Seasonal period must be at least 2".to_string(),
            ));
        }
        if self.horizon_days == 0 {
            return Err(ForecastError::InvalidParameter(
                "Horizon must cover at least one day".to_string(),
            ));
        }
        self.boosting
            .validate()
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))
    }
}
