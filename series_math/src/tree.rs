//! Least-squares regression trees
//!
//! Exact greedy split search: for each feature the rows are sorted once per
//! node and every midpoint between consecutive distinct values is scored by
//! the reduction in squared error. Ties keep the first candidate found
//! (lowest feature index, then lowest threshold), so a fit is reproducible.

use crate::{MathError, Result};

/// Growth limits for a regression tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 3,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted regression tree stored as a flat node arena
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<Node>,
    n_features: usize,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

impl RegressionTree {
    /// Fit a tree to `targets` using the rows selected by `indices`.
    ///
    /// Rows are assumed validated (rectangular, finite).
    pub fn fit(
        rows: &[Vec<f64>],
        targets: &[f64],
        indices: &[usize],
        params: &TreeParams,
    ) -> Result<Self> {
        if indices.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot grow a tree without samples".to_string(),
            ));
        }

        let mut tree = Self {
            nodes: Vec::new(),
            n_features: rows[indices[0]].len(),
        };
        tree.grow(rows, targets, indices, 0, params);
        Ok(tree)
    }

    /// Number of nodes, leaves included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of features the tree was grown on
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Predict one row
    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    fn grow(
        &mut self,
        rows: &[Vec<f64>],
        targets: &[f64],
        indices: &[usize],
        depth: usize,
        params: &TreeParams,
    ) -> usize {
        let slot = self.nodes.len();
        let mean = indices.iter().map(|&i| targets[i]).sum::<f64>() / indices.len() as f64;
        self.nodes.push(Node::Leaf { value: mean });

        if depth >= params.max_depth || indices.len() < params.min_samples_split.max(2) {
            return slot;
        }

        let candidate = match self.best_split(rows, targets, indices, params) {
            Some(c) => c,
            None => return slot,
        };

        // stable partition keeps the original row order inside each child
        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| rows[i][candidate.feature] <= candidate.threshold);

        let left_child = self.grow(rows, targets, &left, depth + 1, params);
        let right_child = self.grow(rows, targets, &right, depth + 1, params);

        self.nodes[slot] = Node::Split {
            feature: candidate.feature,
            threshold: candidate.threshold,
            left: left_child,
            right: right_child,
        };
        slot
    }

    fn best_split(
        &self,
        rows: &[Vec<f64>],
        targets: &[f64],
        indices: &[usize],
        params: &TreeParams,
    ) -> Option<SplitCandidate> {
        let n = indices.len();
        let total: f64 = indices.iter().map(|&i| targets[i]).sum();
        let min_leaf = params.min_samples_leaf.max(1);
        let mut best: Option<SplitCandidate> = None;

        for feature in 0..self.n_features {
            let mut order = indices.to_vec();
            order.sort_by(|&a, &b| rows[a][feature].total_cmp(&rows[b][feature]));

            let mut left_sum = 0.0;
            for k in 0..n - 1 {
                left_sum += targets[order[k]];
                let left_n = k + 1;
                let right_n = n - left_n;

                let here = rows[order[k]][feature];
                let next = rows[order[k + 1]][feature];
                if here == next || left_n < min_leaf || right_n < min_leaf {
                    continue;
                }

                let left_mean = left_sum / left_n as f64;
                let right_mean = (total - left_sum) / right_n as f64;
                let gain = (left_n * right_n) as f64 / n as f64 * (left_mean - right_mean).powi(2);

                if gain > 0.0 && best.as_ref().map_or(true, |b| gain > b.gain) {
                    let mut threshold = here / 2.0 + next / 2.0;
                    // midpoint can round up to `next` for adjacent floats
                    if threshold >= next {
                        threshold = here;
                    }
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        gain,
                    });
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_step_function_is_learned() {
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let targets: Vec<f64> = (0..10).map(|i| if i < 5 { 1.0 } else { 9.0 }).collect();
        let indices: Vec<usize> = (0..10).collect();

        let tree = RegressionTree::fit(&rows, &targets, &indices, &TreeParams::default()).unwrap();

        assert_relative_eq!(tree.predict(&[2.0]), 1.0);
        assert_relative_eq!(tree.predict(&[7.0]), 9.0);
        assert_relative_eq!(tree.predict(&[4.5]), 1.0);
    }

    #[test]
    fn test_picks_informative_feature() {
        let rows: Vec<Vec<f64>> = (0..8).map(|i| vec![1.0, i as f64]).collect();
        let targets: Vec<f64> = (0..8).map(|i| i as f64 * 2.0).collect();
        let indices: Vec<usize> = (0..8).collect();

        let tree = RegressionTree::fit(&rows, &targets, &indices, &TreeParams::default()).unwrap();
        assert!(tree.predict(&[1.0, 0.0]) < tree.predict(&[1.0, 7.0]));
    }

    #[test]
    fn test_constant_target_is_single_leaf() {
        let rows: Vec<Vec<f64>> = (0..6).map(|i| vec![i as f64]).collect();
        let targets = vec![4.0; 6];
        let indices: Vec<usize> = (0..6).collect();

        let tree = RegressionTree::fit(&rows, &targets, &indices, &TreeParams::default()).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_relative_eq!(tree.predict(&[100.0]), 4.0);
    }

    #[test]
    fn test_depth_limit() {
        let rows: Vec<Vec<f64>> = (0..64).map(|i| vec![i as f64]).collect();
        let targets: Vec<f64> = (0..64).map(|i| (i * i) as f64).collect();
        let indices: Vec<usize> = (0..64).collect();
        let params = TreeParams {
            max_depth: 2,
            ..TreeParams::default()
        };

        let tree = RegressionTree::fit(&rows, &targets, &indices, &params).unwrap();
        // at most 3 splits and 4 leaves
        assert!(tree.node_count() <= 7);
    }

    #[test]
    fn test_empty_sample_rejected() {
        let rows = vec![vec![1.0]];
        assert!(RegressionTree::fit(&rows, &[1.0], &[], &TreeParams::default()).is_err());
    }
}
