//! End-to-end forecasting run: load, decompose, train, walk forward

use crate::components::ComponentFrame;
use crate::config::ForecastConfig;
use crate::data::{DailySeries, DataLoader};
use crate::error::{ForecastError, Result};
use crate::models::{GradientBoosting, LinearRegression, ModelKind, Regressor};
use crate::report::ProjectionReport;
use crate::training::TrainingSet;
use crate::utils::{cutoff_before, forecast_accuracy, horizon_after, ForecastAccuracy};
use crate::walk_forward::{walk_forward, ForecastRecords, WalkForwardOutcome};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Everything one run produced
#[derive(Debug, Clone, Serialize)]
pub struct ForecastRun {
    pub target_column: String,
    pub model: String,
    pub observations: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub cutoff: NaiveDate,
    pub period: usize,
    pub horizon: Vec<NaiveDate>,
    pub records: ForecastRecords,
    pub initial_training_rows: usize,
    pub final_training_rows: usize,
    pub skipped: Vec<NaiveDate>,
    pub accuracy: Option<ForecastAccuracy>,
}

impl ForecastRun {
    /// Text report of the projected amounts
    pub fn report(&self) -> ProjectionReport {
        ProjectionReport::from_records(self.target_column.clone(), &self.records)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs the forecasting workflow for a given configuration
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    config: ForecastConfig,
    loader: DataLoader,
}

impl ForecastPipeline {
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        let loader = DataLoader::new(config.date_column.clone(), config.target_column.clone());
        Ok(Self { config, loader })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Load `path` and run on its series
    pub fn run_file<P: AsRef<Path>>(&self, path: P) -> Result<ForecastRun> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading input");
        let series = self.loader.load(path)?;
        self.run_series(&series)
    }

    /// Run on an already loaded series
    pub fn run_series(&self, series: &DailySeries) -> Result<ForecastRun> {
        if series.len() < 2 {
            return Err(ForecastError::DataError(format!(
                "Need at least 2 observations, found {}",
                series.len()
            )));
        }
        info!(
            observations = series.len(),
            first = %series.first_date(),
            last = %series.last_date(),
            "loaded series"
        );

        let components = ComponentFrame::decompose(series, self.config.period, self.config.boundary)?;
        warn!(
            window = self.config.period / 2,
            "components are computed over the full series, so horizon features are \
             smoothed with later observations"
        );

        let cutoff = match self.config.cutoff {
            Some(cutoff) => {
                if cutoff < series.first_date() {
                    return Err(ForecastError::ValidationError(format!(
                        "Cutoff {} precedes the first observation {}",
                        cutoff,
                        series.first_date()
                    )));
                }
                cutoff
            }
            None => {
                // trailing dates without components cannot be forecast
                let end = components.last_defined_date().ok_or_else(|| {
                    ForecastError::DataError(
                        "No date has defined decomposition features".to_string(),
                    )
                })?;
                if end < series.last_date() {
                    info!(
                        %end,
                        last = %series.last_date(),
                        "horizon ends at the last date with defined components"
                    );
                }
                cutoff_before(series.first_date(), end, self.config.horizon_days)?
            }
        };

        let initial = TrainingSet::from_history(&components, series, cutoff)?;
        let initial_training_rows = initial.len();
        let horizon = horizon_after(cutoff, self.config.horizon_days)?;
        info!(%cutoff, initial_rows = initial_training_rows, "built initial training set");

        let (model_name, outcome) = match self.config.model {
            ModelKind::GradientBoosting => {
                let model = GradientBoosting::new(self.config.boosting)?;
                let outcome = self.walk(&model, initial, &horizon, &components, series)?;
                (model.name().to_string(), outcome)
            }
            ModelKind::Linear => {
                let model = LinearRegression::new();
                let outcome = self.walk(&model, initial, &horizon, &components, series)?;
                (model.name().to_string(), outcome)
            }
        };

        let accuracy = if outcome.records.is_empty() {
            None
        } else {
            Some(forecast_accuracy(
                &outcome.records.forecasts(),
                &outcome.records.actuals(),
            )?)
        };

        Ok(ForecastRun {
            target_column: self.config.target_column.clone(),
            model: model_name,
            observations: series.len(),
            first_date: series.first_date(),
            last_date: series.last_date(),
            cutoff,
            period: self.config.period,
            horizon,
            final_training_rows: outcome.training_set.len(),
            records: outcome.records,
            initial_training_rows,
            skipped: outcome.skipped,
            accuracy,
        })
    }

    fn walk<M: Regressor>(
        &self,
        model: &M,
        initial: TrainingSet,
        horizon: &[NaiveDate],
        components: &ComponentFrame,
        series: &DailySeries,
    ) -> Result<WalkForwardOutcome> {
        walk_forward(
            model,
            initial,
            horizon,
            components,
            series,
            self.config.on_missing,
        )
    }
}
