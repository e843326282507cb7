//! Balance-consistency feature engineering
//!
//! A transaction that moves `amount` out of the origin account should leave
//! `newBalanceOrig = oldBalanceOrig - amount`, and symmetrically credit the
//! destination. The two error columns measure how far each side of the books
//! is from that identity; fraudulent rows in the simulator routinely violate
//! it on the destination side.

use anyhow::{ensure, Context, Result};
use polars::prelude::*;

/// Transaction types kept for modeling. Fraud only occurs in these two.
pub const MODEL_TYPES: [&str; 2] = ["TRANSFER", "CASH_OUT"];

/// Model feature columns, in the order the classifier sees them
pub const MODEL_FEATURES: [&str; 10] = [
    "amount",
    "oldBalanceOrig",
    "newBalanceOrig",
    "oldBalanceDest",
    "newBalanceDest",
    "errorBalanceOrig",
    "errorBalanceDest",
    "isTransfer",
    "isZeroOrig",
    "isZeroDest",
];

/// Label column for the classifier
pub const LABEL_COLUMN: &str = "isFraud";

/// Append the two balance error columns:
///
/// * errorBalanceOrig = newBalanceOrig + amount - oldBalanceOrig
/// * errorBalanceDest = oldBalanceDest + amount - newBalanceDest
///
/// Both are exactly zero when the books balance.
pub fn add_balance_errors(df: DataFrame) -> Result<DataFrame> {
    let out = df
        .lazy()
        .with_columns([
            (col("newBalanceOrig") + col("amount") - col("oldBalanceOrig"))
                .alias("errorBalanceOrig"),
            (col("oldBalanceDest") + col("amount") - col("newBalanceDest"))
                .alias("errorBalanceDest"),
        ])
        .collect()
        .context("Failed to derive balance error columns")?;

    Ok(out)
}

/// Restrict to TRANSFER and CASH_OUT rows, add the three indicator columns,
/// and project down to the model features plus the label.
pub fn build_model_frame(df: &DataFrame) -> Result<DataFrame> {
    let selection: Vec<Expr> = MODEL_FEATURES
        .iter()
        .chain(std::iter::once(&LABEL_COLUMN))
        .map(|name| col(*name))
        .collect();

    let frame = df
        .clone()
        .lazy()
        .filter(
            col("type")
                .eq(lit(MODEL_TYPES[0]))
                .or(col("type").eq(lit(MODEL_TYPES[1]))),
        )
        .with_columns([
            col("type")
                .eq(lit("TRANSFER"))
                .cast(DataType::Int8)
                .alias("isTransfer"),
            col("oldBalanceOrig")
                .eq(lit(0.0))
                .and(col("amount").gt(lit(0.0)))
                .cast(DataType::Int8)
                .alias("isZeroOrig"),
            col("oldBalanceDest")
                .eq(lit(0.0))
                .and(col("amount").gt(lit(0.0)))
                .cast(DataType::Int8)
                .alias("isZeroDest"),
        ])
        .select(selection)
        .collect()
        .context("Failed to assemble the model frame")?;

    ensure!(
        frame.height() > 0,
        "No TRANSFER or CASH_OUT rows in the ledger; nothing to model"
    );

    Ok(frame)
}

/// Mean of the label column
pub fn label_prevalence(df: &DataFrame) -> Result<f64> {
    let label = df
        .column(LABEL_COLUMN)
        .with_context(|| format!("Frame is missing the {} column", LABEL_COLUMN))?
        .as_materialized_series();
    Ok(label.mean().unwrap_or(f64::NAN))
}

/// Share of rows where `column` is non-zero
pub fn nonzero_fraction(df: &DataFrame, column: &str) -> Result<f64> {
    let values = df
        .column(column)
        .with_context(|| format!("Frame is missing the {} column", column))?
        .f64()
        .with_context(|| format!("{} column is not a float column", column))?;

    let nonzero = values
        .into_iter()
        .flatten()
        .filter(|value| *value != 0.0)
        .count();

    Ok(nonzero as f64 / df.height() as f64)
}

/// Share of fraud rows where `column` is non-zero
pub fn fraud_nonzero_fraction(df: &DataFrame, column: &str) -> Result<f64> {
    let fraud = df
        .clone()
        .lazy()
        .filter(col(LABEL_COLUMN).eq(lit(1)))
        .collect()
        .context("Failed to extract fraud rows")?;

    nonzero_fraction(&fraud, column)
}

/// Summary statistics in the usual describe() layout, quantiles linearly
/// interpolated over the sorted values
#[derive(Debug, Clone)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Describe a single numeric column, ignoring nulls
pub fn describe_column(df: &DataFrame, column: &str) -> Result<DescriptiveStats> {
    let values = df
        .column(column)
        .with_context(|| format!("Frame is missing the {} column", column))?
        .f64()
        .with_context(|| format!("{} column is not a float column", column))?;

    let mut sorted: Vec<f64> = values.into_iter().flatten().collect();
    ensure!(
        !sorted.is_empty(),
        "Column '{}' has no non-null values to describe",
        column
    );
    sorted.sort_by(|a, b| a.total_cmp(b));

    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    // Sample variance, so a single value describes as std 0
    let variance = if count > 1 {
        sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64
    } else {
        0.0
    };

    Ok(DescriptiveStats {
        count,
        mean,
        std: variance.sqrt(),
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted[count - 1],
    })
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let weight = position - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}
