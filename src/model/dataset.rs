//! In-memory dataset for tree fitting
//!
//! Row-major feature matrix with a parallel label vector. Built once from the
//! model frame and then only ever indexed, so the trees can share it across
//! threads without copying.

use anyhow::{ensure, Context, Result};
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::error::ModelError;

/// Feature matrix plus labels
#[derive(Debug, Clone)]
pub struct Dataset {
    /// One row per sample, `feature_names.len()` values each
    pub features: Vec<Vec<f64>>,
    /// One label per sample, 1.0 for fraud and 0.0 otherwise
    pub labels: Vec<f64>,
    /// Column names in feature order
    pub feature_names: Vec<String>,
}

/// Train/test partition of a dataset
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
}

impl Dataset {
    pub fn new(feature_names: Vec<String>) -> Self {
        Self {
            features: Vec::new(),
            labels: Vec::new(),
            feature_names,
        }
    }

    /// Materialize a dataset from a DataFrame. Every feature column is cast
    /// to Float64; nulls are rejected because the trees have no missing-value
    /// branch.
    pub fn from_frame(
        df: &DataFrame,
        feature_columns: &[&str],
        label_column: &str,
    ) -> Result<Self> {
        let n_samples = df.height();

        let mut columns: Vec<Vec<f64>> = Vec::with_capacity(feature_columns.len());
        for name in feature_columns {
            columns.push(column_values(df, name)?);
        }
        let labels = column_values(df, label_column)?;

        let mut features = Vec::with_capacity(n_samples);
        for row in 0..n_samples {
            features.push(columns.iter().map(|col| col[row]).collect());
        }

        Ok(Self {
            features,
            labels,
            feature_names: feature_columns.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Add a single sample
    pub fn add_sample(&mut self, features: Vec<f64>, label: f64) {
        assert_eq!(
            features.len(),
            self.feature_names.len(),
            "sample width must match the feature names"
        );
        self.features.push(features);
        self.labels.push(label);
    }

    pub fn n_samples(&self) -> usize {
        self.features.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Share of positive labels
    pub fn positive_ratio(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        let positives = self.labels.iter().filter(|&&label| label > 0.5).count();
        positives as f64 / self.labels.len() as f64
    }

    /// Copy of the samples at `indices`, in order
    pub fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            feature_names: self.feature_names.clone(),
        }
    }

    /// Bootstrap sample indices: `n_samples` draws with replacement
    pub fn bootstrap_indices(&self, seed: u64) -> Vec<usize> {
        let n = self.n_samples();
        if n == 0 {
            return Vec::new();
        }
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..n).map(|_| rng.gen_range(0..n)).collect()
    }

    /// Split into train and test partitions, stratified by label.
    ///
    /// Each class is shuffled separately and `round(class_size * fraction)`
    /// of it goes to the test side, so both partitions keep the full
    /// dataset's class balance as closely as rounding allows.
    pub fn stratified_split(&self, test_fraction: f64, seed: u64) -> Result<Split, ModelError> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(ModelError::InvalidTestFraction(test_fraction));
        }
        if self.n_samples() == 0 {
            return Err(ModelError::EmptyDataset);
        }
        if self.labels.len() != self.n_samples() {
            return Err(ModelError::LabelLengthMismatch {
                labels: self.labels.len(),
                samples: self.n_samples(),
            });
        }

        let (positives, negatives): (Vec<usize>, Vec<usize>) =
            (0..self.n_samples()).partition(|&i| self.labels[i] > 0.5);

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut train_indices = Vec::new();
        let mut test_indices = Vec::new();

        for mut class_indices in [negatives, positives] {
            class_indices.shuffle(&mut rng);
            let test_n = ((class_indices.len() as f64 * test_fraction).round() as usize)
                .min(class_indices.len());
            test_indices.extend_from_slice(&class_indices[..test_n]);
            train_indices.extend_from_slice(&class_indices[test_n..]);
        }

        if train_indices.is_empty() {
            return Err(ModelError::EmptySplit("train"));
        }
        if test_indices.is_empty() {
            return Err(ModelError::EmptySplit("test"));
        }

        Ok(Split {
            train: self.subset(&train_indices),
            test: self.subset(&test_indices),
        })
    }
}

fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .with_context(|| format!("Frame is missing the {} column", name))?;
    ensure!(
        column.null_count() == 0,
        "Column '{}' contains nulls; the model cannot train on missing values",
        name
    );

    let values = column
        .cast(&DataType::Float64)
        .with_context(|| format!("Cannot cast {} to Float64", name))?;
    Ok(values
        .f64()
        .with_context(|| format!("Cannot read {} as Float64", name))?
        .into_iter()
        .flatten()
        .collect())
}
