//! End-to-end tests across the whole analysis pipeline

use fraudsight::model::{Dataset, ForestConfig, RandomForest};
use fraudsight::pipeline::{
    add_balance_errors, build_eda_sample, build_model_frame, correlation_matrix,
    label_correlations, label_prevalence, load_transactions, load_transactions_chunked,
    missing_required_columns, normalize_columns, profile_table, write_sample, LABEL_COLUMN,
    MODEL_FEATURES, REQUIRED_COLUMNS,
};
use polars::prelude::*;
use std::fs::File;

#[path = "common/mod.rs"]
mod common;

use common::*;

/// The whole pipeline on a ledger with one deliberately unbooked fraud
/// transfer: load, harmonize, profile, sample, derive features, correlate,
/// split, and fit.
#[test]
fn test_end_to_end_on_a_synthetic_ledger() {
    let mut fixture = create_paysim_dataframe();
    let (temp_dir, csv_path) = create_temp_csv(&mut fixture);

    // Load and harmonize
    let mut df = load_transactions(&csv_path, 100).unwrap();
    normalize_columns(&mut df).unwrap();
    assert!(missing_required_columns(&df).is_empty());
    assert_has_columns(&df, &REQUIRED_COLUMNS);

    // Profile
    let profile = profile_table(&df).unwrap();
    assert_eq!(profile.rows, 10);
    assert_eq!(profile.fraud_rows, 2);
    assert_eq!(profile.fraud_by_type[0].0, "TRANSFER");

    // Stratified sample, persisted and read back
    let mut sample = build_eda_sample(&df, 4, 42).unwrap();
    assert_eq!(sample.height(), 6, "Two fraud rows plus four drawn rows");
    let sample_path = temp_dir.path().join("eda_sample.parquet");
    write_sample(&mut sample, &sample_path).unwrap();
    let restored = ParquetReader::new(File::open(&sample_path).unwrap())
        .finish()
        .unwrap();
    assert_eq!(restored.get_column_names_str(), df.get_column_names_str());
    assert_eq!(restored.dtypes(), df.dtypes());

    // Balance errors: the unbooked transfer is the only inconsistent row,
    // so exactly two error values are nonzero and both sit on that row
    let df = add_balance_errors(df).unwrap();
    let err_orig = float_column(&df, "errorBalanceOrig");
    let err_dest = float_column(&df, "errorBalanceDest");
    let nonzero: Vec<(usize, f64, f64)> = err_orig
        .iter()
        .zip(&err_dest)
        .enumerate()
        .filter(|(_, (o, d))| **o != 0.0 || **d != 0.0)
        .map(|(i, (o, d))| (i, *o, *d))
        .collect();
    assert_eq!(nonzero, vec![(0, 1000.0, 1000.0)]);

    // Modeling subset
    let model_frame = build_model_frame(&df).unwrap();
    assert_shape(&model_frame, 5, 11);
    assert!((label_prevalence(&model_frame).unwrap() - 0.4).abs() < 1e-12);

    // Correlations: the error columns carry the fraud signal
    let corr_columns: Vec<&str> = MODEL_FEATURES
        .iter()
        .copied()
        .chain(std::iter::once(LABEL_COLUMN))
        .collect();
    let (matrix, names) = correlation_matrix(&model_frame, &corr_columns).unwrap();
    let ranked = label_correlations(&matrix, &names, LABEL_COLUMN);
    assert!(ranked[0].0.starts_with("errorBalance"));
    assert!(ranked[0].1 > 0.5);

    // Split and fit
    let data = Dataset::from_frame(&model_frame, &MODEL_FEATURES, LABEL_COLUMN).unwrap();
    let split = data.stratified_split(0.3, 42).unwrap();
    assert_eq!(split.train.n_samples(), 3);
    assert_eq!(split.test.n_samples(), 2);
    assert!((split.test.positive_ratio() - 0.5).abs() < 1e-12);

    let mut forest = RandomForest::new(ForestConfig {
        n_trees: 15,
        seed: 42,
        ..Default::default()
    });
    forest.fit(&split.train).unwrap();

    let ranking = forest.feature_importance_ranking();
    assert_eq!(ranking.len(), MODEL_FEATURES.len());
    let total: f64 = ranking.iter().map(|(_, v)| v).sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn test_chunked_and_bulk_loads_agree_end_to_end() {
    let mut fixture = create_paysim_dataframe();
    let (_temp_dir, csv_path) = create_temp_csv(&mut fixture);

    let mut bulk = load_transactions(&csv_path, 100).unwrap();
    let mut chunked = load_transactions_chunked(&csv_path, 100, 3).unwrap();

    normalize_columns(&mut bulk).unwrap();
    normalize_columns(&mut chunked).unwrap();

    let bulk_frame = build_model_frame(&add_balance_errors(bulk).unwrap()).unwrap();
    let chunked_frame = build_model_frame(&add_balance_errors(chunked).unwrap()).unwrap();

    assert!(
        bulk_frame.equals(&chunked_frame),
        "Chunked loading should not change what the model sees"
    );
}

#[test]
fn test_missing_required_columns_are_reported() {
    let mut crippled = create_paysim_dataframe()
        .drop("oldbalanceDest")
        .unwrap()
        .drop("type")
        .unwrap();
    let (_temp_dir, csv_path) = create_temp_csv(&mut crippled);

    let mut df = load_transactions(&csv_path, 100).unwrap();
    normalize_columns(&mut df).unwrap();

    let missing = missing_required_columns(&df);
    assert_eq!(missing, vec!["type".to_string(), "oldBalanceDest".to_string()]);
}
