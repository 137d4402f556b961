//! Application context: owns the configuration and runs one forecast at a time

use crate::error::{AppError, Result};
use crate::presentation::{render_chart, ChartOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walk_forecast::{DailySeries, ForecastConfig, ForecastPipeline, ForecastRun, ProjectionReport};

/// Default location of the chart image, relative to the working directory
pub const DEFAULT_CHART_PATH: &str = "forecast_plot.png";

/// Forecast settings plus where and how to draw the chart
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub forecast: ForecastConfig,
    pub chart_path: PathBuf,
    pub chart: ChartOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(ForecastConfig::default())
    }
}

impl AppConfig {
    pub fn new(forecast: ForecastConfig) -> Self {
        let chart = ChartOptions {
            y_label: forecast.target_column.clone(),
            ..ChartOptions::default()
        };
        Self {
            forecast,
            chart_path: PathBuf::from(DEFAULT_CHART_PATH),
            chart,
        }
    }

    pub fn with_chart_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chart_path = path.into();
        self
    }

    pub fn with_chart_size(mut self, width: u32, height: u32) -> Self {
        self.chart.width = width;
        self.chart.height = height;
        self
    }
}

/// What one processing run produced
#[derive(Debug)]
pub struct ProcessOutcome {
    pub run: ForecastRun,
    pub report: ProjectionReport,
    /// Path of the written chart, or why it could not be drawn
    pub chart: Result<PathBuf>,
}

/// The application context
#[derive(Debug)]
pub struct App {
    config: AppConfig,
    busy: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            busy: false,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Whether a run is in progress
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Load `input`, walk forward over the horizon and present the results.
    ///
    /// A chart that cannot be drawn does not fail the run; the error is kept
    /// in [`ProcessOutcome::chart`].
    pub fn process<P: AsRef<Path>>(&mut self, input: P) -> Result<ProcessOutcome> {
        let input = input.as_ref();
        self.guarded(|config| {
            let pipeline = ForecastPipeline::new(config.forecast.clone())?;
            pipeline.run_file(input).map_err(AppError::from)
        })
    }

    /// Same as [`App::process`] for a series already in memory
    pub fn process_series(&mut self, series: &DailySeries) -> Result<ProcessOutcome> {
        self.guarded(|config| {
            let pipeline = ForecastPipeline::new(config.forecast.clone())?;
            pipeline.run_series(series).map_err(AppError::from)
        })
    }

    /// Write the report text to the file `destination`, replacing it
    pub fn copy_report<P: AsRef<Path>>(
        &self,
        report: &ProjectionReport,
        destination: P,
    ) -> Result<()> {
        fs::write(destination.as_ref(), report.to_string())?;
        info!(path = %destination.as_ref().display(), "copied projected amounts");
        Ok(())
    }

    fn guarded<F>(&mut self, run: F) -> Result<ProcessOutcome>
    where
        F: FnOnce(&AppConfig) -> Result<ForecastRun>,
    {
        if self.busy {
            return Err(AppError::Busy);
        }
        self.busy = true;
        let result = run(&self.config).map(|forecast| self.present(forecast));
        self.busy = false;
        result
    }

    fn present(&self, run: ForecastRun) -> ProcessOutcome {
        let report = run.report();
        let chart = render_chart(&self.config.chart_path, &run.records, &self.config.chart)
            .map(|()| self.config.chart_path.clone());
        match &chart {
            Ok(path) => info!(path = %path.display(), "chart written"),
            Err(e) => warn!(error = %e, "chart not rendered"),
        }
        ProcessOutcome { run, report, chart }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use walk_forecast::data::synthetic_daily_series;

    #[test]
    fn test_refuses_to_start_while_busy() {
        let mut app = App::new(AppConfig::default());
        app.busy = true;

        let series = synthetic_daily_series(
            "gross_posted",
            NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            60,
            3,
        )
        .unwrap();
        assert!(matches!(app.process_series(&series), Err(AppError::Busy)));
        assert!(app.is_busy());
    }

    #[test]
    fn test_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.chart_path, PathBuf::from("forecast_plot.png"));
        assert_eq!(config.chart.y_label, "gross_posted");

        let sized = config.with_chart_size(1200, 800);
        assert_eq!((sized.chart.width, sized.chart.height), (1200, 800));
    }
}
