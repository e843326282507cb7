//! Weighted CART decision tree for binary classification
//!
//! Split search sorts each candidate feature once and sweeps running
//! weighted event counts, so evaluating every threshold of a feature costs
//! one pass instead of one partition per candidate. Thresholds fall on the
//! midpoint between adjacent distinct values.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::dataset::Dataset;
use super::error::ModelError;

/// Tree growth parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth, None grows until leaves are pure or too small
    pub max_depth: Option<usize>,
    /// Minimum raw sample count a node needs before a split is attempted
    pub min_samples_split: usize,
    /// Minimum raw sample count on each side of an accepted split
    pub min_samples_leaf: usize,
    /// Features considered per node, None means all of them
    pub max_features: Option<usize>,
    /// Seed for the per-node feature subsampling
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
struct TreeNode {
    feature_idx: Option<usize>,
    threshold: Option<f64>,
    /// Weighted share of positive labels at this node
    positive_prob: f64,
    left: Option<Box<TreeNode>>,
    right: Option<Box<TreeNode>>,
}

struct CandidateSplit {
    feature_idx: usize,
    threshold: f64,
    gain: f64,
}

/// A fitted decision tree
#[derive(Debug, Clone)]
pub struct DecisionTree {
    config: TreeConfig,
    root: Option<TreeNode>,
    feature_importances: Vec<f64>,
}

impl DecisionTree {
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            root: None,
            feature_importances: Vec::new(),
        }
    }

    /// Fit on the samples selected by `indices`. Weights are per-sample and
    /// indexed by the same positions as the dataset, so bootstrap duplicates
    /// simply pull the same weight twice.
    pub fn fit(
        &mut self,
        data: &Dataset,
        indices: &[usize],
        weights: &[f64],
    ) -> Result<(), ModelError> {
        if data.n_samples() == 0 || indices.is_empty() {
            return Err(ModelError::EmptyDataset);
        }
        if weights.len() != data.n_samples() {
            return Err(ModelError::WeightLengthMismatch {
                weights: weights.len(),
                samples: data.n_samples(),
            });
        }

        self.feature_importances = vec![0.0; data.n_features()];
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let root = self.build_node(data, indices, weights, 0, &mut rng);
        self.root = Some(root);

        // Normalize importances so each tree contributes on the same scale
        let total: f64 = self.feature_importances.iter().sum();
        if total > 0.0 {
            for importance in &mut self.feature_importances {
                *importance /= total;
            }
        }

        Ok(())
    }

    fn build_node(
        &mut self,
        data: &Dataset,
        indices: &[usize],
        weights: &[f64],
        depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> TreeNode {
        let mut positive_weight = 0.0;
        let mut total_weight = 0.0;
        for &i in indices {
            total_weight += weights[i];
            if data.labels[i] > 0.5 {
                positive_weight += weights[i];
            }
        }

        let positive_prob = if total_weight > 0.0 {
            positive_weight / total_weight
        } else {
            0.0
        };
        let impurity = gini_impurity(positive_weight, total_weight - positive_weight);

        let leaf = TreeNode {
            feature_idx: None,
            threshold: None,
            positive_prob,
            left: None,
            right: None,
        };

        let depth_exhausted = self.config.max_depth.is_some_and(|max| depth >= max);
        if depth_exhausted
            || indices.len() < self.config.min_samples_split
            || impurity < 1e-12
            || total_weight <= 0.0
        {
            return leaf;
        }

        let Some(split) = self.best_split(data, indices, weights, impurity, total_weight, rng)
        else {
            return leaf;
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| data.features[i][split.feature_idx] <= split.threshold);

        self.feature_importances[split.feature_idx] += split.gain * total_weight;

        let left = self.build_node(data, &left_indices, weights, depth + 1, rng);
        let right = self.build_node(data, &right_indices, weights, depth + 1, rng);

        TreeNode {
            feature_idx: Some(split.feature_idx),
            threshold: Some(split.threshold),
            positive_prob,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }

    /// Best weighted-Gini split over a random feature subset.
    ///
    /// For each candidate feature the samples are sorted by value and the
    /// boundary between every pair of distinct adjacent values is scored
    /// with running weighted event counts.
    fn best_split(
        &self,
        data: &Dataset,
        indices: &[usize],
        weights: &[f64],
        parent_impurity: f64,
        total_weight: f64,
        rng: &mut ChaCha8Rng,
    ) -> Option<CandidateSplit> {
        let n_features = data.n_features();
        let max_features = self
            .config
            .max_features
            .unwrap_or(n_features)
            .clamp(1, n_features);

        let mut feature_pool: Vec<usize> = (0..n_features).collect();
        feature_pool.shuffle(rng);
        feature_pool.truncate(max_features);

        let n = indices.len();
        let total_positive: f64 = indices
            .iter()
            .filter(|&&i| data.labels[i] > 0.5)
            .map(|&i| weights[i])
            .sum();

        let mut best: Option<CandidateSplit> = None;
        let mut best_gain = 0.0;

        for feature_idx in feature_pool {
            let mut samples: Vec<(f64, bool, f64)> = indices
                .iter()
                .map(|&i| {
                    (
                        data.features[i][feature_idx],
                        data.labels[i] > 0.5,
                        weights[i],
                    )
                })
                .collect();
            samples.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_positive = 0.0;
            let mut left_weight = 0.0;

            for k in 0..n - 1 {
                let (value, is_positive, weight) = samples[k];
                left_weight += weight;
                if is_positive {
                    left_positive += weight;
                }

                let next_value = samples[k + 1].0;
                if value == next_value {
                    continue;
                }

                let left_count = k + 1;
                if left_count < self.config.min_samples_leaf
                    || n - left_count < self.config.min_samples_leaf
                {
                    continue;
                }

                let right_weight = total_weight - left_weight;
                if left_weight <= 0.0 || right_weight <= 0.0 {
                    continue;
                }
                let right_positive = total_positive - left_positive;

                let left_gini = gini_impurity(left_positive, left_weight - left_positive);
                let right_gini = gini_impurity(right_positive, right_weight - right_positive);
                let weighted_child_gini =
                    (left_weight * left_gini + right_weight * right_gini) / total_weight;

                let gain = parent_impurity - weighted_child_gini;
                if gain > best_gain {
                    best_gain = gain;
                    best = Some(CandidateSplit {
                        feature_idx,
                        threshold: (value + next_value) / 2.0,
                        gain,
                    });
                }
            }
        }

        best
    }

    /// Probability of the positive class for one feature row
    pub fn predict_proba_one(&self, row: &[f64]) -> f64 {
        match &self.root {
            Some(root) => traverse(root, row),
            // An unfitted tree knows nothing; stay on the fence
            None => 0.5,
        }
    }

    /// Per-feature importance, normalized to sum to 1 when any split exists
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }
}

fn traverse(node: &TreeNode, row: &[f64]) -> f64 {
    match (node.feature_idx, node.threshold, &node.left, &node.right) {
        (Some(feature_idx), Some(threshold), Some(left), Some(right)) => {
            if row[feature_idx] <= threshold {
                traverse(left, row)
            } else {
                traverse(right, row)
            }
        }
        _ => node.positive_prob,
    }
}

/// Gini impurity of a weighted binary node: 2p(1-p)
fn gini_impurity(events: f64, non_events: f64) -> f64 {
    let total = events + non_events;
    if total == 0.0 {
        return 0.0;
    }
    let p = events / total;
    2.0 * p * (1.0 - p)
}
