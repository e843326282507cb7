//! Header cleanup for raw PaySim exports
//!
//! The simulator ships balance columns in an inconsistent casing scheme
//! ('oldbalanceOrg', 'newbalanceOrig', ...). Everything downstream expects
//! the harmonized camelCase spellings, so the rename happens once, right
//! after loading.

use anyhow::{Context, Result};
use polars::prelude::*;

/// Raw header -> harmonized header for the four balance columns
pub const BALANCE_RENAMES: [(&str, &str); 4] = [
    ("oldbalanceOrg", "oldBalanceOrig"),
    ("newbalanceOrig", "newBalanceOrig"),
    ("oldbalanceDest", "oldBalanceDest"),
    ("newbalanceDest", "newBalanceDest"),
];

/// Columns the pipeline needs after harmonization
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "type",
    "amount",
    "oldBalanceOrig",
    "newBalanceOrig",
    "oldBalanceDest",
    "newBalanceDest",
    "isFraud",
];

/// Trim whitespace from every column label and harmonize the balance
/// column spellings. Renames whose source column is absent are skipped,
/// so partial exports survive this stage and fail later with a clear
/// missing-column message instead.
pub fn normalize_columns(df: &mut DataFrame) -> Result<()> {
    let trimmed: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.trim().to_string())
        .collect();
    df.set_column_names(trimmed)
        .context("Failed to apply trimmed column labels")?;

    for (raw, harmonized) in BALANCE_RENAMES {
        let present = df
            .get_column_names()
            .iter()
            .any(|name| name.as_str() == raw);
        if present {
            df.rename(raw, harmonized.into())
                .with_context(|| format!("Failed to rename column '{}'", raw))?;
        }
    }

    Ok(())
}

/// List the required columns missing from the table, empty when complete
pub fn missing_required_columns(df: &DataFrame) -> Vec<String> {
    let names: Vec<&str> = df
        .get_column_names()
        .iter()
        .map(|name| name.as_str())
        .collect();

    REQUIRED_COLUMNS
        .iter()
        .filter(|required| !names.contains(*required))
        .map(|required| required.to_string())
        .collect()
}
