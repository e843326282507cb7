//! Error types for dataset assembly and model training.
//!
//! These cover programmer-visible misuse (mismatched lengths, an unfitted
//! forest) and degenerate inputs (empty datasets, impossible splits). All of
//! them convert into `anyhow::Error` at the pipeline boundary.

use thiserror::Error;

/// Errors raised while assembling datasets or fitting the forest
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    /// Dataset has no samples, so neither splitting nor fitting can proceed
    #[error("dataset contains no samples")]
    EmptyDataset,

    /// A feature row is wider or narrower than the declared feature count
    #[error("feature row has {found} values, expected {expected}")]
    FeatureWidthMismatch { expected: usize, found: usize },

    /// Label vector length differs from the number of sample rows
    #[error("label count {labels} does not match sample count {samples}")]
    LabelLengthMismatch { labels: usize, samples: usize },

    /// Sample weight vector length differs from the number of sample rows
    #[error("weight count {weights} does not match sample count {samples}")]
    WeightLengthMismatch { weights: usize, samples: usize },

    /// Test fraction outside the open interval (0, 1)
    #[error("test fraction {0} must be strictly between 0 and 1")]
    InvalidTestFraction(f64),

    /// A stratified split left one partition empty.
    ///
    /// Happens when a class has so few samples that rounding assigns all of
    /// them to one side, e.g. a single-row dataset.
    #[error("stratified split left the {0} partition empty")]
    EmptySplit(&'static str),

    /// Prediction was requested before the forest was fitted
    #[error("forest has not been fitted")]
    NotFitted,
}
