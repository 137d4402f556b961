//! # Walk Forecast
//!
//! Walk-forward forecasting of daily series.
//!
//! ## Features
//!
//! - Daily series loading from workbooks and CSV files (`date`, `gross_posted`)
//! - Classical additive decomposition into trend, seasonal and residual features
//! - Regression models on the decomposition features (Gradient Boosting, Linear)
//! - A walk-forward loop that predicts each day before observing it, then
//!   appends the observation and retrains
//! - Projection reports, accuracy metrics, CSV and JSON exports
//!
//! ## Quick Start
//!
//! ```no_run
//! use walk_forecast::config::ForecastConfig;
//! use walk_forecast::pipeline::ForecastPipeline;
//!
//! let pipeline = ForecastPipeline::new(ForecastConfig::default())?;
//! let run = pipeline.run_file("postings.xlsx")?;
//!
//! print!("{}", run.report());
//! # Ok::<(), walk_forecast::ForecastError>(())
//! ```

pub mod components;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod training;
pub mod utils;
pub mod walk_forward;

// Re-export commonly used types
pub use crate::components::{ComponentFrame, FeatureTriple};
pub use crate::config::ForecastConfig;
pub use crate::data::{DailySeries, DataLoader};
pub use crate::error::{ForecastError, Result};
pub use crate::models::{FittedRegressor, ModelKind, Regressor};
pub use crate::pipeline::{ForecastPipeline, ForecastRun};
pub use crate::report::ProjectionReport;
pub use crate::training::TrainingSet;
pub use crate::walk_forward::{
    walk_forward, ForecastRecords, ForecastStep, MissingObservationPolicy, WalkForwardOutcome,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
