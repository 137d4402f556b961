//! Walk-forward forecasting with nightly retraining
//!
//! For every horizon date, in order: build the feature triple, predict with
//! the model fit on everything before that date, record the observed value,
//! append the observation to the training set and refit. A forecast never
//! sees its own date's target.

use crate::components::ComponentFrame;
use crate::data::DailySeries;
use crate::error::{ForecastError, Result};
use crate::models::{FittedRegressor, Regressor};
use crate::training::TrainingSet;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// What to do when a horizon date has no observed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingObservationPolicy {
    /// Abort the run with [`ForecastError::MissingObservation`]
    #[default]
    Fail,
    /// Leave the date out of the records and keep going
    Skip,
}

/// One walk-forward step
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastStep {
    pub date: NaiveDate,
    pub forecast: f64,
    pub actual: f64,
    /// Rows the predicting model was fit on
    pub training_rows: usize,
    /// Last date the predicting model was fit on
    pub trained_through: NaiveDate,
}

/// Forecast and actual values, index-aligned by horizon date
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastRecords {
    steps: Vec<ForecastStep>,
}

impl ForecastRecords {
    pub fn steps(&self) -> &[ForecastStep] {
        &self.steps
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.steps.iter().map(|s| s.date).collect()
    }

    pub fn forecasts(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.forecast).collect()
    }

    pub fn actuals(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.actual).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Write `date,forecast,actual` rows
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["date", "forecast", "actual"])?;
        for step in &self.steps {
            writer.write_record([
                step.date.format("%Y-%m-%d").to_string(),
                step.forecast.to_string(),
                step.actual.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Result of a complete walk-forward run
#[derive(Debug, Clone)]
pub struct WalkForwardOutcome {
    pub records: ForecastRecords,
    /// Training set after the last observation was appended
    pub training_set: TrainingSet,
    /// Horizon dates left out under [`MissingObservationPolicy::Skip`]
    pub skipped: Vec<NaiveDate>,
}

/// Run the walk-forward loop over `horizon`.
///
/// `initial` is consumed and returned, grown by one row per forecast date.
/// Any fit or predict failure aborts the whole run.
pub fn walk_forward<M: Regressor>(
    model: &M,
    initial: TrainingSet,
    horizon: &[NaiveDate],
    components: &ComponentFrame,
    truth: &DailySeries,
    on_missing: MissingObservationPolicy,
) -> Result<WalkForwardOutcome> {
    validate_horizon(&initial, horizon)?;

    let mut training = initial;
    let mut fitted = model.fit(&training)?;
    let mut steps = Vec::with_capacity(horizon.len());
    let mut skipped = Vec::new();

    info!(
        model = model.name(),
        initial_rows = training.len(),
        horizon = horizon.len(),
        "starting walk-forward run"
    );

    for &date in horizon {
        // only the presence of the observation is checked before predicting
        let actual = match truth.value_on(date) {
            Some(value) => value,
            None => match on_missing {
                MissingObservationPolicy::Fail => {
                    return Err(ForecastError::MissingObservation(date))
                }
                MissingObservationPolicy::Skip => {
                    warn!(%date, "no observed value, skipping horizon date");
                    skipped.push(date);
                    continue;
                }
            },
        };

        let features = components
            .features_on(date)
            .filter(|f| f.is_finite())
            .ok_or(ForecastError::NonFiniteFeatures(date))?;

        let forecast = fitted.predict(&features)?;
        if !forecast.is_finite() {
            return Err(ForecastError::ModelError(format!(
                "{} produced a non-finite forecast for {}",
                fitted.name(),
                date
            )));
        }

        let trained_through = fitted.trained_through().ok_or_else(|| {
            ForecastError::ModelError("Model was fit on an empty training set".to_string())
        })?;
        steps.push(ForecastStep {
            date,
            forecast,
            actual,
            training_rows: fitted.training_rows(),
            trained_through,
        });
        debug!(%date, forecast, actual, rows = training.len(), "walk-forward step");

        training.append(date, features, actual)?;
        fitted = model.fit(&training)?;
    }

    info!(
        forecasts = steps.len(),
        skipped = skipped.len(),
        final_rows = training.len(),
        "walk-forward run complete"
    );

    Ok(WalkForwardOutcome {
        records: ForecastRecords { steps },
        training_set: training,
        skipped,
    })
}

fn validate_horizon(initial: &TrainingSet, horizon: &[NaiveDate]) -> Result<()> {
    let last = initial.last_date().ok_or_else(|| {
        ForecastError::ValidationError("Initial training set is empty".to_string())
    })?;

    if let Some(first) = horizon.first() {
        if *first <= last {
            return Err(ForecastError::ValidationError(format!(
                "Horizon starts {} but training data runs through {}",
                first, last
            )));
        }
    }
    if let Some(w) = horizon.windows(2).find(|w| w[1] <= w[0]) {
        return Err(ForecastError::ValidationError(format!(
            "Horizon dates must be strictly increasing: {} is followed by {}",
            w[0], w[1]
        )));
    }
    Ok(())
}
