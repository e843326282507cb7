//! Stratified EDA sample
//!
//! Fraud is rare enough that a uniform sample would carry almost none of it.
//! The sample written here keeps every fraud row and tops up with a seeded
//! random draw of non-fraud rows, capped so the file stays small enough to
//! reload interactively.

use anyhow::{Context, Result};
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;

/// Default cap on non-fraud rows in the sample
pub const DEFAULT_SAMPLE_CAP: usize = 200_000;

/// Build the stratified sample: all fraud rows first, then up to `cap`
/// non-fraud rows drawn without replacement. The same seed always selects
/// the same rows.
pub fn build_eda_sample(df: &DataFrame, cap: usize, seed: u64) -> Result<DataFrame> {
    let fraud = df
        .clone()
        .lazy()
        .filter(col("isFraud").eq(lit(1)))
        .collect()
        .context("Failed to extract fraud rows for the EDA sample")?;
    let legit = df
        .clone()
        .lazy()
        .filter(col("isFraud").eq(lit(0)))
        .collect()
        .context("Failed to extract non-fraud rows for the EDA sample")?;

    let take = cap.min(legit.height());
    let mut indices: Vec<IdxSize> = (0..legit.height() as IdxSize).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    indices.truncate(take);

    let drawn = legit
        .take(&IdxCa::from_vec("idx".into(), indices))
        .context("Failed to gather sampled non-fraud rows")?;

    let mut sample = fraud;
    sample
        .vstack_mut(&drawn)
        .context("Failed to stack the EDA sample")?;
    sample.as_single_chunk_par();

    Ok(sample)
}

/// Write the sample as Snappy-compressed Parquet with full column statistics
pub fn write_sample(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create sample file: {}", path.display()))?;

    ParquetWriter::new(file)
        .with_compression(ParquetCompression::Snappy)
        .with_statistics(StatisticsOptions::full())
        .finish(df)
        .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;

    Ok(())
}
