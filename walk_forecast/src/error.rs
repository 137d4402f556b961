//! Error types for the walk_forecast crate

use chrono::NaiveDate;
use polars::prelude::PolarsError;
use series_math::MathError;
use thiserror::Error;

/// Custom error types for the walk_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to input data (missing columns, bad dates, too few rows)
    #[error("Data error: {0}")]
    DataError(String),

    /// Error related to argument or sequence validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from fitting or evaluating a regression model
    #[error("Model error: {0}")]
    ModelError(String),

    /// A horizon date has no observed value in the source series
    #[error("No observed value for horizon date {0}")]
    MissingObservation(NaiveDate),

    /// A horizon date has undefined or non-finite decomposition components
    #[error("Decomposition features for {0} are undefined or not finite")]
    NonFiniteFeatures(NaiveDate),

    /// Error from the numeric kernels
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error opening or reading a workbook
    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(String),

    /// Error writing CSV exports
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error serializing results
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<calamine::Error> for ForecastError {
    fn from(err: calamine::Error) -> Self {
        ForecastError::SpreadsheetError(err.to_string())
    }
}

impl ForecastError {
    /// Whether this error stems from the input file rather than the model
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ForecastError::DataError(_)
                | ForecastError::IoError(_)
                | ForecastError::PolarsError(_)
                | ForecastError::SpreadsheetError(_)
        )
    }
}
