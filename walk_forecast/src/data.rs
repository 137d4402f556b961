//! Daily series handling and input loading
//!
//! Workbooks (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) are read with calamine,
//! CSV files with polars. Both paths end in a polars `DataFrame` and share one
//! extraction step that turns the date and value columns into a [`DailySeries`].

use crate::error::{ForecastError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Days, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;
use statrs::statistics::Statistics;
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

/// Default name of the date column
pub const DEFAULT_DATE_COLUMN: &str = "date";
/// Default name of the target column
pub const DEFAULT_TARGET_COLUMN: &str = "gross_posted";

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Ordered daily observations, dates unique and strictly increasing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySeries {
    /// Name of the observed quantity
    name: String,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl DailySeries {
    /// Create a series, validating ordering and values
    pub fn new(name: impl Into<String>, dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::ValidationError(format!(
                "Dates length ({}) doesn't match values length ({})",
                dates.len(),
                values.len()
            )));
        }
        if dates.is_empty() {
            return Err(ForecastError::DataError("Empty time series".to_string()));
        }
        if let Some(w) = dates.windows(2).find(|w| w[1] <= w[0]) {
            return Err(ForecastError::DataError(format!(
                "Dates must be strictly increasing: {} is followed by {}",
                w[0], w[1]
            )));
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::DataError(format!(
                "Value on {} is not a finite number",
                dates[i]
            )));
        }

        Ok(Self {
            name: name.into(),
            dates,
            values,
        })
    }

    /// Name of the observed quantity
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn last_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    /// Position of `date` in the series
    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Observed value on `date`
    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.position(date).map(|i| self.values[i])
    }

    /// Pairs of consecutive dates more than one day apart
    pub fn gaps(&self) -> Vec<(NaiveDate, NaiveDate)> {
        self.dates
            .windows(2)
            .filter(|w| (w[1] - w[0]).num_days() > 1)
            .map(|w| (w[0], w[1]))
            .collect()
    }

    /// Mean of the observed values
    pub fn mean(&self) -> f64 {
        self.values.iter().mean()
    }

    /// Sample standard deviation of the observed values
    pub fn std_dev(&self) -> f64 {
        self.values.iter().std_dev()
    }

    /// Write the series as `date,<name>` CSV rows
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record([DEFAULT_DATE_COLUMN, self.name.as_str()])?;
        for (date, value) in self.dates.iter().zip(self.values.iter()) {
            writer.write_record([date.format("%Y-%m-%d").to_string(), value.to_string()])?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Data loader for daily series files
#[derive(Debug, Clone)]
pub struct DataLoader {
    date_column: String,
    value_column: String,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_COLUMN, DEFAULT_TARGET_COLUMN)
    }
}

impl DataLoader {
    /// Create a loader that reads the given date and value columns
    pub fn new(date_column: impl Into<String>, value_column: impl Into<String>) -> Self {
        Self {
            date_column: date_column.into(),
            value_column: value_column.into(),
        }
    }

    /// Load a series, choosing the reader from the file extension
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<DailySeries> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => self.from_csv(path),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => self.from_spreadsheet(path),
            other => Err(ForecastError::DataError(format!(
                "Unsupported input file type '{}' for {}",
                other,
                path.display()
            ))),
        }
    }

    /// Load a series from a CSV file
    pub fn from_csv<P: AsRef<Path>>(&self, path: P) -> Result<DailySeries> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        self.from_dataframe(&df)
    }

    /// Load a series from the first sheet of a workbook
    pub fn from_spreadsheet<P: AsRef<Path>>(&self, path: P) -> Result<DailySeries> {
        let mut workbook = open_workbook_auto(path.as_ref())?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ForecastError::SpreadsheetError("Workbook has no sheets".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;
        let mut rows = range.rows();
        let header = rows
            .next()
            .ok_or_else(|| ForecastError::DataError(format!("Sheet '{}' is empty", sheet_name)))?;

        let names: Vec<String> = header.iter().map(|c| c.to_string()).collect();
        let date_idx = find_column(names.iter().map(String::as_str), &self.date_column)?;
        let value_idx = find_column(names.iter().map(String::as_str), &self.value_column)?;

        let mut dates: Vec<Option<String>> = Vec::new();
        let mut values: Vec<Option<f64>> = Vec::new();
        for row in rows {
            if row.iter().all(|c| matches!(c, Data::Empty)) {
                continue;
            }
            dates.push(row.get(date_idx).and_then(date_cell_text));
            values.push(row.get(value_idx).and_then(value_cell));
        }
        debug!(sheet = %sheet_name, rows = dates.len(), "read workbook sheet");

        let df = DataFrame::new(vec![
            Series::new(&self.date_column, dates),
            Series::new(&self.value_column, values),
        ])?;

        self.from_dataframe(&df)
    }

    /// Extract the configured columns from a DataFrame
    pub fn from_dataframe(&self, df: &DataFrame) -> Result<DailySeries> {
        if df.height() == 0 {
            return Err(ForecastError::DataError(
                "Input contains no data rows".to_string(),
            ));
        }

        let date_name = find_column(df.get_column_names().into_iter(), &self.date_column)?;
        let value_name = find_column(df.get_column_names().into_iter(), &self.value_column)?;
        let date_col = &df.get_columns()[date_name];
        let value_col = &df.get_columns()[value_name];

        let date_text = date_col.cast(&DataType::Utf8)?;
        let mut dates = Vec::with_capacity(df.height());
        for (row, raw) in date_text.utf8()?.into_iter().enumerate() {
            let raw = raw.ok_or_else(|| {
                ForecastError::DataError(format!("Missing date in data row {}", row + 1))
            })?;
            let date = parse_date(raw).ok_or_else(|| {
                ForecastError::DataError(format!(
                    "Unparseable date '{}' in data row {}",
                    raw,
                    row + 1
                ))
            })?;
            dates.push(date);
        }

        let numeric = value_col.cast(&DataType::Float64)?;
        let mut values = Vec::with_capacity(df.height());
        for (row, value) in numeric.f64()?.into_iter().enumerate() {
            let value = value.ok_or_else(|| {
                ForecastError::DataError(format!(
                    "Missing or non-numeric '{}' in data row {}",
                    self.value_column,
                    row + 1
                ))
            })?;
            values.push(value);
        }

        let series = DailySeries::new(self.value_column.clone(), dates, values)?;
        let gaps = series.gaps();
        if !gaps.is_empty() {
            warn!(
                gaps = gaps.len(),
                first_gap_after = %gaps[0].0,
                "series has calendar gaps; decomposition treats rows as consecutive"
            );
        }
        Ok(series)
    }
}

/// Index of the column whose trimmed name matches `wanted` case-insensitively
fn find_column<'a>(names: impl Iterator<Item = &'a str>, wanted: &str) -> Result<usize> {
    let names: Vec<&str> = names.collect();
    names
        .iter()
        .position(|n| n.trim().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| {
            ForecastError::DataError(format!(
                "Required column '{}' not found (columns: {})",
                wanted,
                names.join(", ")
            ))
        })
}

/// Parse the date forms found in exported spreadsheets
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| raw.parse::<f64>().ok().and_then(excel_serial_to_date))
}

/// Convert an Excel 1900-system serial day number to a date
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}

fn date_cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64()).map(|d| d.to_string()),
        Data::Float(f) => excel_serial_to_date(*f).map(|d| d.to_string()),
        Data::Int(i) => excel_serial_to_date(*i as f64).map(|d| d.to_string()),
        Data::String(s) | Data::DateTimeIso(s) => Some(s.clone()),
        _ => None,
    }
}

fn value_cell(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Generate a deterministic daily series with linear trend, period-12
/// seasonality and Gaussian noise
pub fn synthetic_daily_series(
    name: &str,
    start: NaiveDate,
    days: usize,
    seed: u64,
) -> Result<DailySeries> {
    let noise = Normal::new(0.0, 15.0)
        .map_err(|e| ForecastError::InvalidParameter(format!("Noise distribution: {}", e)))?;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut dates = Vec::with_capacity(days);
    let mut values = Vec::with_capacity(days);
    for i in 0..days {
        let date = start
            .checked_add_days(Days::new(i as u64))
            .ok_or_else(|| ForecastError::InvalidParameter("Date range overflow".to_string()))?;
        let phase = (i % 12) as f64 * std::f64::consts::TAU / 12.0;
        let value = 1_000.0 + 2.5 * i as f64 + 80.0 * phase.sin() + noise.sample(&mut rng);
        dates.push(date);
        values.push(value);
    }

    DailySeries::new(name, dates, values)
}
