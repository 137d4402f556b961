//! Realized-vs-forecast chart

use crate::error::{AppError, Result};
use chrono::NaiveDate;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use walk_forecast::ForecastRecords;

/// Chart appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub y_label: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 700,
            height: 500,
            title: "Realized vs Forecasted".to_string(),
            y_label: "gross_posted".to_string(),
        }
    }
}

/// Draw realized and forecasted values against the horizon dates as a PNG,
/// replacing any existing file at `path`.
pub fn render_chart<P: AsRef<Path>>(
    path: P,
    records: &ForecastRecords,
    options: &ChartOptions,
) -> Result<()> {
    if records.is_empty() {
        return Err(AppError::Chart("No forecast records to plot".to_string()));
    }
    if options.width == 0 || options.height == 0 {
        return Err(AppError::Chart(format!(
            "Invalid chart size {}x{}",
            options.width, options.height
        )));
    }

    let dates = records.dates();
    let actuals = records.actuals();
    let forecasts = records.forecasts();
    let (y_min, y_max) = value_range(actuals.iter().chain(forecasts.iter()).copied());
    let (x_start, x_end) = date_span(&dates);

    let root = BitMapBackend::new(path.as_ref(), (options.width, options.height))
        .into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&options.title, ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_start..x_end, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(&options.y_label)
        .x_labels(8)
        .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m-%d").to_string())
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            dates.iter().copied().zip(actuals.iter().copied()),
            BLUE,
        ))?
        .label("Realized Values")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .draw_series(LineSeries::new(
            dates.iter().copied().zip(forecasts.iter().copied()),
            RED,
        ))?
        .label("Forecasted Values")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// First and last date of the axis; a single date gets a one-day span
fn date_span(dates: &[NaiveDate]) -> (NaiveDate, NaiveDate) {
    let first = dates[0];
    let last = dates[dates.len() - 1];
    if last > first {
        (first, last)
    } else {
        (first, first.succ_opt().unwrap_or(first))
    }
}

/// Min and max with a 5% margin; flat data gets a unit band
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let span = max - min;
    if span == 0.0 {
        (min - 1.0, max + 1.0)
    } else {
        (min - span * 0.05, max + span * 0.05)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_range_adds_margin() {
        let (lo, hi) = value_range([10.0, 20.0].into_iter());
        assert!((lo - 9.5).abs() < 1e-12);
        assert!((hi - 20.5).abs() < 1e-12);
    }

    #[test]
    fn test_value_range_flat_and_empty() {
        assert_eq!(value_range([3.0, 3.0].into_iter()), (2.0, 4.0));
        assert_eq!(value_range(std::iter::empty()), (0.0, 1.0));
        assert_eq!(value_range([f64::NAN].into_iter()), (0.0, 1.0));
    }

    #[test]
    fn test_date_span_keeps_calendar_gaps() {
        let ymd = |d| NaiveDate::from_ymd_opt(2023, 1, d).unwrap();
        // skipped days stay on the axis as calendar distance
        assert_eq!(date_span(&[ymd(1), ymd(2), ymd(9)]), (ymd(1), ymd(9)));
        assert_eq!(date_span(&[ymd(5)]), (ymd(5), ymd(6)));
    }
}
