//! Model module - dataset plumbing and the random forest baseline

pub mod dataset;
pub mod error;
pub mod forest;
pub mod tree;

pub use dataset::{Dataset, Split};
pub use error::ModelError;
pub use forest::{balanced_sample_weights, ForestConfig, RandomForest};
pub use tree::{DecisionTree, TreeConfig};
