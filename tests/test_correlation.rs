//! Unit tests for the feature correlation matrix

use fraudsight::pipeline::{
    add_balance_errors, build_model_frame, correlation_matrix, label_correlations, LABEL_COLUMN,
    MODEL_FEATURES,
};

#[path = "common/mod.rs"]
mod common;

use common::*;

fn corr_columns() -> Vec<&'static str> {
    MODEL_FEATURES
        .iter()
        .copied()
        .chain(std::iter::once(LABEL_COLUMN))
        .collect()
}

#[test]
fn test_matrix_covers_features_and_label() {
    let df = add_balance_errors(create_harmonized_dataframe()).unwrap();
    let frame = build_model_frame(&df).unwrap();

    let columns = corr_columns();
    let (matrix, names) = correlation_matrix(&frame, &columns).unwrap();

    assert_eq!(names.len(), 11);
    assert_eq!(names.last().unwrap(), "isFraud");
    assert_eq!(matrix.nrows(), 11);
    assert_eq!(matrix.ncols(), 11);

    for i in 0..11 {
        assert_eq!(matrix[(i, i)], 1.0, "Diagonal entry {} should be 1", i);
        for j in 0..11 {
            assert!(
                (matrix[(i, j)] - matrix[(j, i)]).abs() < 1e-9,
                "Matrix should be symmetric at ({}, {})",
                i,
                j
            );
            assert!(
                matrix[(i, j)].abs() <= 1.0 + 1e-9,
                "Correlation at ({}, {}) out of range: {}",
                i,
                j,
                matrix[(i, j)]
            );
        }
    }
}

#[test]
fn test_error_columns_track_the_label_hardest() {
    let df = add_balance_errors(create_harmonized_dataframe()).unwrap();
    let frame = build_model_frame(&df).unwrap();

    let columns = corr_columns();
    let (matrix, names) = correlation_matrix(&frame, &columns).unwrap();
    let ranked = label_correlations(&matrix, &names, LABEL_COLUMN);

    assert_eq!(ranked.len(), 10, "Every feature except the label is ranked");

    // Both error columns flag the same unbooked fraud row, so they tie at
    // the top of the ranking
    assert_eq!(ranked[0].0, "errorBalanceOrig");
    assert_eq!(ranked[1].0, "errorBalanceDest");
    assert!(ranked[0].1 > 0.5, "Got r = {}", ranked[0].1);
    assert!((ranked[0].1 - ranked[1].1).abs() < 1e-9);

    for pair in ranked.windows(2) {
        assert!(
            pair[0].1.abs() >= pair[1].1.abs() - 1e-12,
            "Ranking should be ordered by magnitude: {:?}",
            ranked
        );
    }
}

#[test]
fn test_identical_error_columns_correlate_perfectly() {
    let df = add_balance_errors(create_harmonized_dataframe()).unwrap();
    let frame = build_model_frame(&df).unwrap();

    let columns = corr_columns();
    let (matrix, names) = correlation_matrix(&frame, &columns).unwrap();

    let orig = names.iter().position(|n| n == "errorBalanceOrig").unwrap();
    let dest = names.iter().position(|n| n == "errorBalanceDest").unwrap();
    assert!((matrix[(orig, dest)] - 1.0).abs() < 1e-9);
}

#[test]
fn test_constant_indicator_stays_in_the_matrix() {
    let df = add_balance_errors(create_harmonized_dataframe()).unwrap();
    let frame = build_model_frame(&df).unwrap();

    let columns = corr_columns();
    let (matrix, names) = correlation_matrix(&frame, &columns).unwrap();

    // isZeroOrig is constant on the fixture; it keeps its row rather than
    // collapsing the matrix
    let idx = names.iter().position(|n| n == "isZeroOrig").unwrap();
    assert_eq!(matrix[(idx, idx)], 1.0);
    for j in 0..names.len() {
        if j != idx {
            assert_eq!(
                matrix[(idx, j)],
                0.0,
                "Constant column should report zero correlation with {}",
                names[j]
            );
        }
    }

    let ranked = label_correlations(&matrix, &names, LABEL_COLUMN);
    let last = ranked.last().unwrap();
    assert_eq!(last.0, "isZeroOrig");
    assert_eq!(last.1, 0.0);
}

#[test]
fn test_unknown_label_yields_an_empty_ranking() {
    let df = add_balance_errors(create_harmonized_dataframe()).unwrap();
    let frame = build_model_frame(&df).unwrap();

    let columns = corr_columns();
    let (matrix, names) = correlation_matrix(&frame, &columns).unwrap();

    assert!(label_correlations(&matrix, &names, "noSuchColumn").is_empty());
}
