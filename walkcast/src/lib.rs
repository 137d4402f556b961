//! # Walkcast
//!
//! Command-line front end for walk-forward forecasting of daily gross
//! postings. Loads a workbook or CSV file, runs the
//! [`walk_forecast`] pipeline, renders a realized-vs-forecast chart and
//! prints the projected amounts.
//!
//! ## Example
//!
//! ```no_run
//! use walkcast::{App, AppConfig};
//!
//! let mut app = App::new(AppConfig::default());
//! let outcome = app.process("postings.xlsx")?;
//! print!("{}", outcome.report);
//! # Ok::<(), walkcast::AppError>(())
//! ```

pub mod app;
pub mod error;
pub mod presentation;

pub use crate::app::{App, AppConfig, ProcessOutcome};
pub use crate::error::{AppError, Result};
pub use crate::presentation::{render_chart, ChartOptions};

pub use walk_forecast;
