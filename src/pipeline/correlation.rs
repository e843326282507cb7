//! Pearson correlation over the model features
//!
//! Builds the full correlation matrix with one matrix product instead of
//! per-pair passes: standardize each column, assemble Z, then R = Z^T * Z.

use anyhow::{ensure, Context, Result};
use faer::Mat;
use polars::prelude::*;
use rayon::prelude::*;

/// Correlation matrix over `columns`, in the given column order.
///
/// Constant and all-null columns cannot be standardized; their off-diagonal
/// entries are reported as 0 and the diagonal stays 1, which keeps the
/// matrix square over all requested columns instead of silently dropping
/// rows from the heatmap.
pub fn correlation_matrix(df: &DataFrame, columns: &[&str]) -> Result<(Mat<f64>, Vec<String>)> {
    let n_rows = df.height();
    ensure!(n_rows > 0, "Cannot correlate an empty frame");

    let float_columns: Vec<(String, Column)> = columns
        .iter()
        .map(|name| {
            let column = df
                .column(name)
                .with_context(|| format!("Frame is missing the {} column", name))?
                .cast(&DataType::Float64)
                .with_context(|| format!("Cannot cast {} to Float64", name))?;
            Ok((name.to_string(), column))
        })
        .collect::<Result<_>>()?;

    // Standardize in parallel; None marks a constant or all-null column
    let standardized: Vec<Option<Vec<f64>>> = float_columns
        .par_iter()
        .map(|(_, column)| standardized_values(column))
        .collect();

    let n_cols = float_columns.len();
    let mut z = Mat::<f64>::zeros(n_rows, n_cols);
    for (col_idx, values) in standardized.iter().enumerate() {
        if let Some(values) = values {
            for (row_idx, &value) in values.iter().enumerate() {
                z[(row_idx, col_idx)] = value;
            }
        }
    }

    // Columns carry 1/sqrt(n) scaling, so Z^T * Z is already the correlation
    let mut matrix = z.transpose() * &z;
    for i in 0..n_cols {
        matrix[(i, i)] = 1.0;
    }

    let names = float_columns.into_iter().map(|(name, _)| name).collect();
    Ok((matrix, names))
}

/// Standardize a column to zero mean and unit variance, scaled by 1/sqrt(n)
/// over the valid values. Nulls contribute 0 after standardization.
fn standardized_values(column: &Column) -> Option<Vec<f64>> {
    let ca = column.f64().ok()?;

    let mut sum = 0.0;
    let mut count = 0usize;
    for value in ca.into_iter().flatten() {
        sum += value;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    let mean = sum / count as f64;

    let sum_sq_dev: f64 = ca
        .into_iter()
        .flatten()
        .map(|value| {
            let dev = value - mean;
            dev * dev
        })
        .sum();
    let std = (sum_sq_dev / count as f64).sqrt();
    if std == 0.0 {
        return None;
    }

    let scale = 1.0 / (count as f64).sqrt();
    Some(
        ca.into_iter()
            .map(|value| value.map_or(0.0, |x| scale * (x - mean) / std))
            .collect(),
    )
}

/// Correlations of every feature against `label`, strongest magnitude first
pub fn label_correlations(
    matrix: &Mat<f64>,
    names: &[String],
    label: &str,
) -> Vec<(String, f64)> {
    let Some(label_idx) = names.iter().position(|name| name == label) else {
        return Vec::new();
    };

    let mut ranked: Vec<(String, f64)> = names
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != label_idx)
        .map(|(i, name)| (name.clone(), matrix[(i, label_idx)]))
        .collect();

    // Sort by absolute correlation descending
    ranked.sort_by(|a, b| {
        b.1.abs()
            .partial_cmp(&a.1.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    ranked
}
