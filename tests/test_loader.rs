//! Unit tests for the ledger loader

use fraudsight::pipeline::{
    load_transactions, load_transactions_chunked, load_with_fallback, LoadMode,
};
use polars::prelude::*;
use std::io::Write;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_load_csv_pins_the_declared_dtypes() {
    let mut df = create_paysim_dataframe();
    let (_temp_dir, csv_path) = create_temp_csv(&mut df);

    let loaded = load_transactions(&csv_path, 100).unwrap();

    assert_shape(&loaded, 10, 11);
    assert_eq!(loaded.column("step").unwrap().dtype(), &DataType::Int32);
    assert_eq!(loaded.column("type").unwrap().dtype(), &DataType::String);
    assert_eq!(loaded.column("amount").unwrap().dtype(), &DataType::Float64);
    assert_eq!(loaded.column("isFraud").unwrap().dtype(), &DataType::Int8);
    assert_eq!(
        loaded.column("isFlaggedFraud").unwrap().dtype(),
        &DataType::Int8
    );
}

#[test]
fn test_load_matches_columns_by_name_not_position() {
    // Same ledger, columns written in a different order than the dtype map
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("shuffled.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "isFraud,amount,type,step").unwrap();
    writeln!(file, "1,250.5,TRANSFER,3").unwrap();
    writeln!(file, "0,10.0,PAYMENT,4").unwrap();
    drop(file);

    let loaded = load_transactions(&csv_path, 100).unwrap();

    assert_eq!(loaded.column("isFraud").unwrap().dtype(), &DataType::Int8);
    assert_eq!(loaded.column("step").unwrap().dtype(), &DataType::Int32);
    assert_eq!(loaded.column("amount").unwrap().dtype(), &DataType::Float64);
    assert_eq!(
        loaded.get_column_names_str(),
        vec!["isFraud", "amount", "type", "step"]
    );
}

#[test]
fn test_load_missing_file_errors_with_the_path() {
    let result = load_transactions(std::path::Path::new("no/such/ledger.csv"), 100);

    let err = format!("{:#}", result.unwrap_err());
    assert!(
        err.contains("ledger.csv"),
        "Error should name the missing file, got: {}",
        err
    );
}

#[test]
fn test_chunked_load_matches_bulk_load() {
    let mut df = create_paysim_dataframe();
    let (_temp_dir, csv_path) = create_temp_csv(&mut df);

    let bulk = load_transactions(&csv_path, 100).unwrap();
    let chunked = load_transactions_chunked(&csv_path, 100, 3).unwrap();

    assert!(
        bulk.equals(&chunked),
        "Chunked load should reconstruct the exact bulk table"
    );
}

#[test]
fn test_chunked_load_handles_chunk_size_dividing_the_rows() {
    // 10 rows in chunks of 5 forces a final empty read
    let mut df = create_paysim_dataframe();
    let (_temp_dir, csv_path) = create_temp_csv(&mut df);

    let bulk = load_transactions(&csv_path, 100).unwrap();
    let chunked = load_transactions_chunked(&csv_path, 100, 5).unwrap();

    assert!(bulk.equals(&chunked));
}

#[test]
fn test_chunked_load_with_oversized_chunk_reads_once() {
    let mut df = create_paysim_dataframe();
    let (_temp_dir, csv_path) = create_temp_csv(&mut df);

    let chunked = load_transactions_chunked(&csv_path, 100, 1_000).unwrap();

    assert_shape(&chunked, 10, 11);
}

#[test]
fn test_chunked_load_rejects_zero_chunk_size() {
    let mut df = create_paysim_dataframe();
    let (_temp_dir, csv_path) = create_temp_csv(&mut df);

    assert!(load_transactions_chunked(&csv_path, 100, 0).is_err());
}

#[test]
fn test_fallback_uses_the_bulk_path_when_memory_is_fine() {
    let mut df = create_paysim_dataframe();
    let (_temp_dir, csv_path) = create_temp_csv(&mut df);

    let (loaded, mode) = load_with_fallback(&csv_path, 100, 3).unwrap();

    assert_eq!(mode, LoadMode::Bulk);
    assert_shape(&loaded, 10, 11);
}

#[test]
fn test_fallback_propagates_non_memory_errors() {
    let result = load_with_fallback(std::path::Path::new("no/such/ledger.csv"), 100, 3);
    assert!(result.is_err());
}
