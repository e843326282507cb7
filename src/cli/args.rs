//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

/// Fraudsight - Profile a PaySim-style mobile money ledger and train a random forest fraud baseline
#[derive(Parser, Debug)]
#[command(name = "fraudsight")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input transaction ledger (CSV with the PaySim column layout)
    #[arg(short, long, default_value = "data/PaySim_dataset.csv")]
    pub input: PathBuf,

    /// Output path for the stratified EDA sample (Parquet).
    /// Defaults to 'eda_sample.parquet' next to the input file.
    #[arg(short, long)]
    pub sample_output: Option<PathBuf>,

    /// Maximum number of non-fraud rows kept in the EDA sample.
    /// All fraud rows are always kept regardless of this cap.
    #[arg(long, default_value = "200000")]
    pub sample_cap: usize,

    /// Number of trees in the random forest
    #[arg(long, default_value = "100")]
    pub trees: usize,

    /// Fraction of model rows held out as a test partition (stratified by label)
    #[arg(long, default_value = "0.3", value_parser = validate_test_fraction)]
    pub test_fraction: f64,

    /// Seed for sampling, the train/test split, and tree growth
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Number of rows to use for schema inference.
    /// Higher values improve type detection for ambiguous columns but may be slower.
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Rows per chunk when the bulk CSV read runs out of memory and the
    /// loader falls back to chunked reading
    #[arg(long, default_value = "300000", value_parser = validate_chunk_size)]
    pub chunk_size: usize,

    /// Number of log-spaced bins in the transaction amount histogram
    #[arg(long, default_value = "100")]
    pub amount_bins: usize,

    /// Skip the terminal charts (fraud rates, amount histogram, correlation heatmap)
    #[arg(long, default_value = "false")]
    pub no_charts: bool,
}

impl Cli {
    /// Get the EDA sample output path, deriving from the input if not explicitly provided.
    /// The derived path sits in the same directory as the input ledger.
    pub fn sample_output_path(&self) -> PathBuf {
        self.sample_output.clone().unwrap_or_else(|| {
            let parent = self
                .input
                .parent()
                .unwrap_or_else(|| std::path::Path::new("."));
            parent.join("eda_sample.parquet")
        })
    }
}

/// Validator for the test_fraction parameter
fn validate_test_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value <= 0.0 || value >= 1.0 {
        Err(format!(
            "test_fraction must be strictly between 0.0 and 1.0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}

/// Validator for the chunk_size parameter
fn validate_chunk_size(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value == 0 {
        Err("chunk_size must be at least 1".to_string())
    } else {
        Ok(value)
    }
}
