//! Gradient boosted regression trees with squared-error loss
//!
//! The ensemble starts from the target mean and adds one shallow tree per
//! stage, each fit to the current residuals and shrunk by the learning rate.
//! With `subsample < 1.0` every stage trains on a random subset of rows drawn
//! from a generator seeded with `seed`, so a fixed seed gives a fixed model.

use crate::tree::{RegressionTree, TreeParams};
use crate::{validate_design, MathError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Hyperparameters of the boosted ensemble
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostingParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub subsample: f64,
    pub seed: u64,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_split: 2,
            min_samples_leaf: 1,
            subsample: 1.0,
            seed: 0,
        }
    }
}

impl BoostingParams {
    /// Validate parameter ranges
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(MathError::InvalidInput(
                "Number of estimators must be greater than zero".to_string(),
            ));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(MathError::InvalidInput(
                "Learning rate must be a positive finite number".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(MathError::InvalidInput(
                "Max depth must be greater than zero".to_string(),
            ));
        }
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return Err(MathError::InvalidInput(
                "Subsample must be in (0, 1]".to_string(),
            ));
        }
        Ok(())
    }

    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        }
    }
}

/// A fitted boosted ensemble
#[derive(Debug, Clone, PartialEq)]
pub struct GradientBoostedTrees {
    init: f64,
    learning_rate: f64,
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl GradientBoostedTrees {
    /// Fit the ensemble on rectangular, finite `rows` and `targets`.
    pub fn fit(rows: &[Vec<f64>], targets: &[f64], params: &BoostingParams) -> Result<Self> {
        params.validate()?;
        let n_features = validate_design(rows, targets)?;

        let n = rows.len();
        let init = targets.iter().sum::<f64>() / n as f64;
        let mut predictions = vec![init; n];
        let mut residuals = vec![0.0; n];
        let mut trees = Vec::with_capacity(params.n_estimators);

        let tree_params = params.tree_params();
        let sample_size = ((params.subsample * n as f64) as usize).clamp(1, n);
        let mut rng = StdRng::seed_from_u64(params.seed);
        let all_rows: Vec<usize> = (0..n).collect();

        for _ in 0..params.n_estimators {
            for i in 0..n {
                residuals[i] = targets[i] - predictions[i];
            }

            let tree = if sample_size < n {
                let mut chosen = rand::seq::index::sample(&mut rng, n, sample_size).into_vec();
                chosen.sort_unstable();
                RegressionTree::fit(rows, &residuals, &chosen, &tree_params)?
            } else {
                RegressionTree::fit(rows, &residuals, &all_rows, &tree_params)?
            };

            for (pred, row) in predictions.iter_mut().zip(rows.iter()) {
                *pred += params.learning_rate * tree.predict(row);
            }
            trees.push(tree);
        }

        Ok(Self {
            init,
            learning_rate: params.learning_rate,
            trees,
            n_features,
        })
    }

    /// Predict a single row
    pub fn predict(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.n_features {
            return Err(MathError::InvalidInput(format!(
                "Expected {} features, got {}",
                self.n_features,
                row.len()
            )));
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Cannot predict from non-finite features".to_string(),
            ));
        }

        let value = self
            .trees
            .iter()
            .fold(self.init, |acc, tree| acc + self.learning_rate * tree.predict(row));

        if !value.is_finite() {
            return Err(MathError::CalculationError(
                "Boosted prediction is not finite".to_string(),
            ));
        }
        Ok(value)
    }

    /// Number of boosting stages
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Initial (constant) prediction
    pub fn init_value(&self) -> f64 {
        self.init
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn quadratic_design(n: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                let x = i as f64 / n as f64;
                vec![x, (i % 7) as f64, 1.0 - x]
            })
            .collect();
        let targets = rows
            .iter()
            .map(|r| 10.0 * r[0] * r[0] + r[1])
            .collect();
        (rows, targets)
    }

    #[test]
    fn test_fit_reduces_error_below_mean_model() {
        let (rows, targets) = quadratic_design(120);
        let model = GradientBoostedTrees::fit(&rows, &targets, &BoostingParams::default()).unwrap();

        let mean = model.init_value();
        let baseline: f64 = targets.iter().map(|t| (t - mean).powi(2)).sum();
        let boosted: f64 = rows
            .iter()
            .zip(targets.iter())
            .map(|(r, t)| (t - model.predict(r).unwrap()).powi(2))
            .sum();

        assert_eq!(model.n_trees(), 100);
        assert!(boosted < baseline * 0.1);
    }

    #[rstest]
    #[case(1.0)]
    #[case(0.5)]
    fn test_same_seed_same_predictions(#[case] subsample: f64) {
        let (rows, targets) = quadratic_design(80);
        let params = BoostingParams {
            subsample,
            seed: 42,
            ..BoostingParams::default()
        };

        let a = GradientBoostedTrees::fit(&rows, &targets, &params).unwrap();
        let b = GradientBoostedTrees::fit(&rows, &targets, &params).unwrap();
        for row in &rows {
            assert_eq!(
                a.predict(row).unwrap().to_bits(),
                b.predict(row).unwrap().to_bits()
            );
        }
    }

    #[test]
    fn test_single_row_predicts_its_target() {
        let rows = vec![vec![1.0, 2.0, 3.0]];
        let model = GradientBoostedTrees::fit(&rows, &[5.0], &BoostingParams::default()).unwrap();
        assert_relative_eq!(model.predict(&[9.0, 9.0, 9.0]).unwrap(), 5.0);
    }

    #[rstest]
    #[case(BoostingParams { n_estimators: 0, ..BoostingParams::default() })]
    #[case(BoostingParams { learning_rate: 0.0, ..BoostingParams::default() })]
    #[case(BoostingParams { max_depth: 0, ..BoostingParams::default() })]
    #[case(BoostingParams { subsample: 1.5, ..BoostingParams::default() })]
    fn test_invalid_params(#[case] params: BoostingParams) {
        let (rows, targets) = quadratic_design(10);
        assert!(GradientBoostedTrees::fit(&rows, &targets, &params).is_err());
    }

    #[test]
    fn test_predict_rejects_wrong_width_and_nan() {
        let (rows, targets) = quadratic_design(20);
        let model = GradientBoostedTrees::fit(&rows, &targets, &BoostingParams::default()).unwrap();

        assert!(model.predict(&[1.0, 2.0]).is_err());
        assert!(model.predict(&[1.0, f64::NAN, 0.0]).is_err());
    }
}
