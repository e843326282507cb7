//! Random forest over the weighted CART trees
//!
//! Trees grow in parallel with rayon, each on its own bootstrap draw and a
//! seed offset from the forest seed, so runs are reproducible regardless of
//! thread scheduling. Class imbalance is handled with balanced sample
//! weights rather than resampling, keeping every fraud row in play.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::dataset::Dataset;
use super::error::ModelError;
use super::tree::{DecisionTree, TreeConfig};

/// Forest training parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees
    pub n_trees: usize,
    /// Maximum tree depth, None grows trees out fully
    pub max_depth: Option<usize>,
    /// Minimum raw sample count a node needs before a split is attempted
    pub min_samples_split: usize,
    /// Minimum raw sample count on each side of an accepted split
    pub min_samples_leaf: usize,
    /// Features considered per node, None means sqrt of the feature count
    pub max_features: Option<usize>,
    /// Draw a bootstrap sample per tree instead of the full dataset
    pub bootstrap: bool,
    /// Weight samples inversely to their class frequency
    pub balanced: bool,
    /// Base seed; tree i derives its own seed from it
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            balanced: true,
            seed: 42,
        }
    }
}

/// A fitted random forest
#[derive(Debug, Clone)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
    feature_names: Vec<String>,
    feature_importances: Vec<f64>,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            feature_names: Vec::new(),
            feature_importances: Vec::new(),
        }
    }

    /// Fit the forest on the full dataset
    pub fn fit(&mut self, data: &Dataset) -> Result<(), ModelError> {
        if data.n_samples() == 0 {
            return Err(ModelError::EmptyDataset);
        }
        if data.labels.len() != data.n_samples() {
            return Err(ModelError::LabelLengthMismatch {
                labels: data.labels.len(),
                samples: data.n_samples(),
            });
        }
        let n_features = data.n_features();
        for row in &data.features {
            if row.len() != n_features {
                return Err(ModelError::FeatureWidthMismatch {
                    expected: n_features,
                    found: row.len(),
                });
            }
        }

        let max_features = self
            .config
            .max_features
            .unwrap_or_else(|| (n_features as f64).sqrt().ceil() as usize)
            .clamp(1, n_features.max(1));

        let weights = if self.config.balanced {
            balanced_sample_weights(&data.labels)
        } else {
            vec![1.0; data.n_samples()]
        };

        let trees: Result<Vec<DecisionTree>, ModelError> = (0..self.config.n_trees)
            .into_par_iter()
            .map(|i| {
                let tree_seed = self.config.seed.wrapping_add(i as u64);
                let tree_config = TreeConfig {
                    max_depth: self.config.max_depth,
                    min_samples_split: self.config.min_samples_split,
                    min_samples_leaf: self.config.min_samples_leaf,
                    max_features: Some(max_features),
                    seed: tree_seed,
                };

                let indices: Vec<usize> = if self.config.bootstrap {
                    data.bootstrap_indices(tree_seed)
                } else {
                    (0..data.n_samples()).collect()
                };

                let mut tree = DecisionTree::new(tree_config);
                tree.fit(data, &indices, &weights)?;
                Ok(tree)
            })
            .collect();
        let trees = trees?;

        // Mean of the per-tree normalized importances, renormalized so the
        // forest-level scores sum to 1 whenever any tree found a split
        let mut importances = vec![0.0; n_features];
        for tree in &trees {
            for (total, value) in importances.iter_mut().zip(tree.feature_importances()) {
                *total += value;
            }
        }
        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for importance in &mut importances {
                *importance /= total;
            }
        }

        self.trees = trees;
        self.feature_names = data.feature_names.clone();
        self.feature_importances = importances;
        Ok(())
    }

    /// Mean positive-class probability across trees, one entry per sample
    pub fn predict_proba(&self, data: &Dataset) -> Result<Vec<f64>, ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted);
        }

        Ok(data
            .features
            .par_iter()
            .map(|row| {
                let sum: f64 = self
                    .trees
                    .iter()
                    .map(|tree| tree.predict_proba_one(row))
                    .sum();
                sum / self.trees.len() as f64
            })
            .collect())
    }

    /// Hard labels at the 0.5 probability threshold
    pub fn predict(&self, data: &Dataset) -> Result<Vec<f64>, ModelError> {
        let probabilities = self.predict_proba(data)?;
        Ok(probabilities
            .into_iter()
            .map(|p| if p >= 0.5 { 1.0 } else { 0.0 })
            .collect())
    }

    /// Forest-level feature importances, in feature order
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    /// (name, importance) pairs sorted by importance descending
    pub fn feature_importance_ranking(&self) -> Vec<(String, f64)> {
        let mut ranking: Vec<(String, f64)> = self
            .feature_names
            .iter()
            .cloned()
            .zip(self.feature_importances.iter().copied())
            .collect();
        ranking.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranking
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

/// Inverse-frequency sample weights: w = n / (2 * class_count).
///
/// Both classes end up carrying the same total weight, so a 1-in-a-thousand
/// fraud class pulls as hard on the split criterion as the legitimate bulk.
/// Single-class label vectors fall back to uniform weights.
pub fn balanced_sample_weights(labels: &[f64]) -> Vec<f64> {
    let n = labels.len() as f64;
    let positives = labels.iter().filter(|&&label| label > 0.5).count() as f64;
    let negatives = n - positives;

    let (positive_weight, negative_weight) = if positives > 0.0 && negatives > 0.0 {
        (n / (2.0 * positives), n / (2.0 * negatives))
    } else {
        (1.0, 1.0)
    };

    labels
        .iter()
        .map(|&label| {
            if label > 0.5 {
                positive_weight
            } else {
                negative_weight
            }
        })
        .collect()
}
