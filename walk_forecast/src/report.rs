//! Text report of projected amounts

use crate::walk_forward::ForecastRecords;
use chrono::NaiveDate;
use std::fmt;

/// Projected amount per horizon date, rendered one `YYYY-MM-DD: value` line each
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionReport {
    column: String,
    lines: Vec<(NaiveDate, f64)>,
}

impl ProjectionReport {
    pub fn from_records(column: impl Into<String>, records: &ForecastRecords) -> Self {
        Self {
            column: column.into(),
            lines: records
                .steps()
                .iter()
                .map(|s| (s.date, s.forecast))
                .collect(),
        }
    }

    pub fn lines(&self) -> &[(NaiveDate, f64)] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for ProjectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Projected Amounts for '{}':", self.column)?;
        for (date, forecast) in &self.lines {
            writeln!(f, "{}: {}", date.format("%Y-%m-%d"), forecast)?;
        }
        Ok(())
    }
}
