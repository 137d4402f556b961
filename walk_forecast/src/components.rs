//! Decomposition components aligned with series dates

use crate::data::DailySeries;
use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use series_math::{decompose_additive, BoundaryPolicy, Decomposition};
use tracing::debug;

/// Regression inputs for one date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureTriple {
    pub trend: f64,
    pub seasonal: f64,
    pub residual: f64,
}

impl FeatureTriple {
    pub fn new(trend: f64, seasonal: f64, residual: f64) -> Self {
        Self {
            trend,
            seasonal,
            residual,
        }
    }

    /// Features in model column order
    pub fn to_row(&self) -> Vec<f64> {
        vec![self.trend, self.seasonal, self.residual]
    }

    pub fn is_finite(&self) -> bool {
        self.trend.is_finite() && self.seasonal.is_finite() && self.residual.is_finite()
    }
}

/// Additive decomposition of a [`DailySeries`], addressable by date
#[derive(Debug, Clone)]
pub struct ComponentFrame {
    dates: Vec<NaiveDate>,
    decomposition: Decomposition,
}

impl ComponentFrame {
    /// Decompose the full series once.
    ///
    /// The moving-average window is centered, so components near any date
    /// are smoothed with up to `period / 2` later observations.
    pub fn decompose(series: &DailySeries, period: usize, boundary: BoundaryPolicy) -> Result<Self> {
        let decomposition = decompose_additive(series.values(), period, boundary)?;
        debug!(
            observations = series.len(),
            period,
            ?boundary,
            "decomposed series"
        );

        Ok(Self {
            dates: series.dates().to_vec(),
            decomposition,
        })
    }

    /// Features on `date`, if the date is covered and all components defined
    pub fn features_on(&self, date: NaiveDate) -> Option<FeatureTriple> {
        let i = self.dates.binary_search(&date).ok()?;
        self.decomposition
            .components_at(i)
            .map(|(t, s, r)| FeatureTriple::new(t, s, r))
    }

    /// Latest date whose components are all defined
    pub fn last_defined_date(&self) -> Option<NaiveDate> {
        (0..self.dates.len())
            .rev()
            .find(|&i| self.decomposition.components_at(i).is_some())
            .map(|i| self.dates[i])
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn decomposition(&self) -> &Decomposition {
        &self.decomposition
    }

    pub fn period(&self) -> usize {
        self.decomposition.period()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
