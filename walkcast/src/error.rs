//! Application errors

use thiserror::Error;
use walk_forecast::ForecastError;

/// Errors surfaced by the application layer
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error("Chart error: {0}")]
    Chart(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("A forecasting run is already in progress")]
    Busy,
}

// Plotters reports drawing failures through its own error kind
impl<E: std::error::Error + Send + Sync + 'static>
    From<plotters::drawing::DrawingAreaErrorKind<E>> for AppError
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        AppError::Chart(format!("Plot drawing error: {}", err))
    }
}

/// Result type for application operations
pub type Result<T> = std::result::Result<T, AppError>;
