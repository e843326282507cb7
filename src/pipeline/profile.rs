//! Ledger profiling: shape, dtypes, null counts, and fraud prevalence
//!
//! Everything here is read-only over the loaded table. The numbers feed the
//! terminal report and the run summary; nothing is persisted.

use anyhow::{Context, Result};
use polars::prelude::*;
use std::collections::HashMap;

/// Profile of a loaded transaction ledger
#[derive(Debug, Clone)]
pub struct TableProfile {
    pub rows: usize,
    pub cols: usize,
    /// (column, dtype) in table order
    pub dtypes: Vec<(String, String)>,
    /// (column, null count) in table order
    pub null_counts: Vec<(String, usize)>,
    /// Transaction type frequencies, most common first
    pub type_counts: Vec<(String, usize)>,
    /// Number of rows with isFraud == 1
    pub fraud_rows: usize,
    /// Mean of the isFraud column
    pub fraud_ratio: f64,
    /// Share of rows with a zero origin balance before a positive-amount movement
    pub zero_orig_fraction: f64,
    /// Share of rows with a zero destination balance before a positive-amount movement
    pub zero_dest_fraction: f64,
    /// Fraud rate per transaction type, highest first
    pub fraud_by_type: Vec<(String, f64)>,
}

/// Profile the ledger. Expects harmonized column labels.
pub fn profile_table(df: &DataFrame) -> Result<TableProfile> {
    let (rows, cols) = df.shape();

    let dtypes = df
        .get_column_names()
        .iter()
        .zip(df.dtypes())
        .map(|(name, dtype)| (name.to_string(), dtype.to_string()))
        .collect();

    let null_counts = df
        .get_columns()
        .iter()
        .map(|col| (col.name().to_string(), col.null_count()))
        .collect();

    let fraud = df
        .column("isFraud")
        .context("Ledger is missing the isFraud column")?
        .as_materialized_series();
    let fraud_rows = fraud.sum::<i64>().context("Failed to total isFraud")? as usize;
    let fraud_ratio = fraud.mean().unwrap_or(f64::NAN);

    Ok(TableProfile {
        rows,
        cols,
        dtypes,
        null_counts,
        type_counts: type_counts(df)?,
        fraud_rows,
        fraud_ratio,
        zero_orig_fraction: zero_balance_fraction(df, "oldBalanceOrig")?,
        zero_dest_fraction: zero_balance_fraction(df, "oldBalanceDest")?,
        fraud_by_type: fraud_rate_by_type(df)?,
    })
}

/// Count transactions per type, most common first. Null types are reported
/// under a literal "null" bucket so they stay visible in the report.
fn type_counts(df: &DataFrame) -> Result<Vec<(String, usize)>> {
    let types = df
        .column("type")
        .context("Ledger is missing the type column")?
        .str()
        .context("type column is not a string column")?;

    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in types.into_iter() {
        let key = value.unwrap_or("null").to_string();
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    // Alphabetical tiebreak keeps the report stable across runs
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(ranked)
}

/// Share of rows where `balance_col` is exactly zero while the transaction
/// amount is positive. High values on the destination side are a known
/// artifact of how the simulator books fraudulent transfers.
fn zero_balance_fraction(df: &DataFrame, balance_col: &str) -> Result<f64> {
    let balances = df
        .column(balance_col)
        .with_context(|| format!("Ledger is missing the {} column", balance_col))?
        .f64()
        .with_context(|| format!("{} column is not a float column", balance_col))?;
    let amounts = df
        .column("amount")
        .context("Ledger is missing the amount column")?
        .f64()
        .context("amount column is not a float column")?;

    let hits = balances
        .into_iter()
        .zip(amounts)
        .filter(|&(balance, amount)| {
            matches!((balance, amount), (Some(b), Some(a)) if b == 0.0 && a > 0.0)
        })
        .count();

    Ok(hits as f64 / df.height() as f64)
}

/// Mean fraud rate per transaction type, highest first
fn fraud_rate_by_type(df: &DataFrame) -> Result<Vec<(String, f64)>> {
    let grouped = df
        .clone()
        .lazy()
        .group_by([col("type")])
        .agg([col("isFraud").cast(DataType::Float64).mean().alias("fraudRate")])
        // Alphabetical tiebreak keeps the report stable across runs
        .sort(
            ["fraudRate", "type"],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        )
        .collect()
        .context("Failed to compute fraud rates per transaction type")?;

    let types = grouped.column("type")?.str()?;
    let rates = grouped.column("fraudRate")?.f64()?;

    Ok(types
        .into_iter()
        .zip(rates)
        .map(|(ty, rate)| {
            (
                ty.unwrap_or("null").to_string(),
                rate.unwrap_or(f64::NAN),
            )
        })
        .collect())
}

/// First `n` rows rendered as strings, one entry per column
pub fn head_preview(df: &DataFrame, n: usize) -> Vec<(String, Vec<String>)> {
    let take = n.min(df.height());

    df.get_columns()
        .iter()
        .map(|col| {
            let values = (0..take)
                .map(|i| match col.get(i) {
                    // AnyValue's Display wraps strings in quotes; the table
                    // should show the bare value
                    Ok(AnyValue::String(s)) => s.to_string(),
                    Ok(AnyValue::StringOwned(s)) => s.to_string(),
                    Ok(value) => value.to_string(),
                    Err(_) => String::from("?"),
                })
                .collect();
            (col.name().to_string(), values)
        })
        .collect()
}
