//! The growing training set used by the walk-forward loop

use crate::components::{ComponentFrame, FeatureTriple};
use crate::data::DailySeries;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::warn;

/// One training example
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingRow {
    pub features: FeatureTriple,
    pub target: f64,
}

/// Date-keyed training examples.
///
/// Rows can only be appended after the last date, so the set never shrinks
/// and is never reordered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSet {
    rows: BTreeMap<NaiveDate, TrainingRow>,
}

impl TrainingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every date up to and including `cutoff` whose components are defined
    pub fn from_history(
        components: &ComponentFrame,
        series: &DailySeries,
        cutoff: NaiveDate,
    ) -> Result<Self> {
        let mut set = Self::new();
        let mut undefined = 0usize;

        for (&date, &target) in series
            .dates()
            .iter()
            .zip(series.values().iter())
            .take_while(|(d, _)| **d <= cutoff)
        {
            match components.features_on(date) {
                Some(features) => set.append(date, features, target)?,
                None => undefined += 1,
            }
        }

        if set.is_empty() {
            return Err(ForecastError::ValidationError(format!(
                "No training rows with defined components on or before {}",
                cutoff
            )));
        }
        if undefined > 0 {
            warn!(
                undefined,
                %cutoff,
                "dates with undefined components left out of the initial training set"
            );
        }
        Ok(set)
    }

    /// Append a row strictly after the current last date
    pub fn append(&mut self, date: NaiveDate, features: FeatureTriple, target: f64) -> Result<()> {
        if let Some(last) = self.last_date() {
            if date <= last {
                return Err(ForecastError::ValidationError(format!(
                    "Cannot append {} to a training set ending {}",
                    date, last
                )));
            }
        }
        if !features.is_finite() {
            return Err(ForecastError::NonFiniteFeatures(date));
        }
        if !target.is_finite() {
            return Err(ForecastError::ValidationError(format!(
                "Target on {} is not finite",
                date
            )));
        }

        self.rows.insert(date, TrainingRow { features, target });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.keys().next_back().copied()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.rows.contains_key(&date)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&TrainingRow> {
        self.rows.get(&date)
    }

    /// Rows in date order
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &TrainingRow)> {
        self.rows.iter()
    }

    /// Feature matrix and target vector in date order
    pub fn design(&self) -> (Vec<Vec<f64>>, Vec<f64>) {
        self.rows
            .values()
            .map(|row| (row.features.to_row(), row.target))
            .unzip()
    }
}
