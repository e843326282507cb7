//! Shared test utilities and fixture generators

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a ten-row PaySim-style ledger with the raw simulator headers
/// (`oldbalanceOrg` and friends, pre-harmonization).
///
/// The rows are built so every downstream stage has a known answer:
/// - row 0: fraud TRANSFER whose balances were never booked on either side,
///   the only row where `errorBalanceOrig`/`errorBalanceDest` are nonzero
/// - row 1: fraud CASH_OUT with perfectly consistent balances
/// - rows 2-9: consistent non-fraud rows across all five transaction types
///   (rows 6-8 are the non-fraud TRANSFER/CASH_OUT rows kept for modeling)
pub fn create_paysim_dataframe() -> DataFrame {
    df! {
        "step" => [1i32, 1, 2, 2, 3, 3, 4, 4, 5, 5],
        "type" => [
            "TRANSFER", "CASH_OUT", "PAYMENT", "PAYMENT", "CASH_IN",
            "DEBIT", "TRANSFER", "CASH_OUT", "CASH_OUT", "PAYMENT",
        ],
        "amount" => [1000.0f64, 500.0, 100.0, 50.0, 200.0, 25.0, 750.0, 300.0, 150.0, 80.0],
        "nameOrig" => ["C100", "C101", "C102", "C103", "C104", "C105", "C106", "C107", "C108", "C109"],
        "oldbalanceOrg" => [1000.0f64, 500.0, 500.0, 250.0, 300.0, 125.0, 800.0, 400.0, 150.0, 480.0],
        "newbalanceOrig" => [1000.0f64, 0.0, 400.0, 200.0, 100.0, 100.0, 50.0, 100.0, 0.0, 400.0],
        "nameDest" => ["C900", "C901", "M902", "M903", "C904", "C905", "C906", "C907", "C908", "M909"],
        "oldbalanceDest" => [0.0f64, 100.0, 0.0, 50.0, 400.0, 0.0, 200.0, 0.0, 75.0, 20.0],
        "newbalanceDest" => [0.0f64, 600.0, 100.0, 100.0, 600.0, 25.0, 950.0, 300.0, 225.0, 100.0],
        "isFraud" => [1i8, 1, 0, 0, 0, 0, 0, 0, 0, 0],
        "isFlaggedFraud" => [0i8, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    }
    .unwrap()
}

/// The same ledger with harmonized balance column names, ready for the
/// stages after normalization
pub fn create_harmonized_dataframe() -> DataFrame {
    let mut df = create_paysim_dataframe();
    fraudsight::pipeline::normalize_columns(&mut df).unwrap();
    df
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("ledger.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(
        rows, expected_rows,
        "Row count mismatch: expected {}, got {}",
        expected_rows, rows
    );
    assert_eq!(
        cols, expected_cols,
        "Column count mismatch: expected {}, got {}",
        expected_cols, cols
    );
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Collect a Float64 column into a plain vector
pub fn float_column(df: &DataFrame, name: &str) -> Vec<f64> {
    df.column(name)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .flatten()
        .collect()
}

/// Collect an Int8 column into a plain vector
pub fn int8_column(df: &DataFrame, name: &str) -> Vec<i8> {
    df.column(name)
        .unwrap()
        .i8()
        .unwrap()
        .into_iter()
        .flatten()
        .collect()
}
