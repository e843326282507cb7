//! Fraudsight: PaySim Fraud Analysis CLI Tool
//!
//! A command-line tool for profiling simulated mobile money ledgers,
//! engineering balance-consistency features, and training a random forest
//! fraud baseline.

mod cli;
mod model;
mod pipeline;
mod report;
mod utils;

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use cli::Cli;
use model::{Dataset, ForestConfig, RandomForest};
use pipeline::{
    add_balance_errors, build_eda_sample, build_model_frame, correlation_matrix, describe_column,
    fraud_nonzero_fraction, head_preview, label_correlations, label_prevalence,
    load_with_fallback, missing_required_columns, nonzero_fraction, normalize_columns,
    profile_table, write_sample, LoadMode, LABEL_COLUMN, MODEL_FEATURES,
};
use report::{
    amount_histogram, bar_chart, correlation_heatmap, print_describe, print_feature_importances,
    print_fraud_rates, print_head, print_label_correlations, print_schema, print_type_counts,
    RunSummary,
};
use utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sample_path = cli.sample_output_path();

    // Print styled banner
    print_banner(env!("CARGO_PKG_VERSION"));

    // Print configuration card
    print_config(
        &cli.input,
        &sample_path,
        cli.sample_cap,
        cli.trees,
        cli.test_fraction,
        cli.seed,
    );

    let mut summary = RunSummary::new();

    // Step 1: Load the ledger (bulk read, chunked fallback on memory exhaustion)
    print_step_header(1, "Load ledger");

    let step_start = Instant::now();
    println!(); // Blank line before progress bar
    let spinner = create_spinner("Reading transaction ledger...");
    let (mut df, load_mode) = load_with_fallback(&cli.input, cli.infer_schema_length, cli.chunk_size)?;
    match load_mode {
        LoadMode::Bulk => finish_with_success(&spinner, "Ledger loaded"),
        LoadMode::Chunked => finish_with_warning(
            &spinner,
            &format!(
                "Bulk read ran out of memory; ledger loaded in {}-row chunks",
                cli.chunk_size
            ),
        ),
    }

    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    println!("\n    {} Ledger Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);

    summary.ledger_rows = rows;
    summary.ledger_columns = cols;
    let load_elapsed = step_start.elapsed();
    summary.set_load_time(load_elapsed);
    print_step_time(load_elapsed);

    // Step 2: Harmonize column labels
    print_step_header(2, "Schema cleanup");

    normalize_columns(&mut df)?;

    // Verify the columns the rest of the pipeline depends on
    let missing = missing_required_columns(&df);
    if !missing.is_empty() {
        let column_names: Vec<String> =
            df.get_column_names().iter().map(|s| s.to_string()).collect();
        anyhow::bail!(
            "Ledger is missing required column(s) {:?}. Available columns: {:?}",
            missing,
            column_names
        );
    }
    print_success("Column labels harmonized");

    // Step 3: Profile the ledger and persist the stratified EDA sample
    print_step_header(3, "Profile & sample");

    let step_start = Instant::now();
    let profile = profile_table(&df)?;

    print_schema(&profile);
    print_head(&head_preview(&df, 5));
    print_type_counts(&profile.type_counts);

    println!();
    print_count("transactions", profile.rows, None);
    print_count(
        "fraud cases",
        profile.fraud_rows,
        Some(&format!(
            "({:.6} = {:.2}% of all rows)",
            profile.fraud_ratio,
            profile.fraud_ratio * 100.0
        )),
    );
    print_info(&format!(
        "Zero origin balance with positive amount: {:.2}% of rows",
        profile.zero_orig_fraction * 100.0
    ));
    print_info(&format!(
        "Zero destination balance with positive amount: {:.2}% of rows",
        profile.zero_dest_fraction * 100.0
    ));

    print_fraud_rates(&profile.fraud_by_type);
    if !cli.no_charts {
        bar_chart(
            "Fraud rate by transaction type",
            &profile.fraud_by_type,
            6,
        );

        let amounts: Vec<f64> = df.column("amount")?.f64()?.into_iter().flatten().collect();
        amount_histogram(&amounts, cli.amount_bins);
    }

    println!();
    let spinner = create_spinner("Building stratified EDA sample...");
    let mut sample = build_eda_sample(&df, cli.sample_cap, cli.seed)?;
    write_sample(&mut sample, &sample_path)?;
    finish_with_success(
        &spinner,
        &format!(
            "EDA sample ({} rows) written to {}",
            sample.height(),
            sample_path.display()
        ),
    );

    summary.fraud_rows = profile.fraud_rows;
    summary.fraud_ratio = profile.fraud_ratio;
    summary.sample_rows = sample.height();
    summary.sample_path = Some(sample_path.clone());
    drop(sample);

    let profile_elapsed = step_start.elapsed();
    summary.set_profile_time(profile_elapsed);
    print_step_time(profile_elapsed);

    // Step 4: Balance-error features and the modeling subset
    print_step_header(4, "Balance-error features");

    let step_start = Instant::now();
    let df = add_balance_errors(df)?;

    print_describe(
        "Balance error statistics",
        &[
            ("errorBalanceOrig", describe_column(&df, "errorBalanceOrig")?),
            ("errorBalanceDest", describe_column(&df, "errorBalanceDest")?),
        ],
    );

    println!();
    for column in ["errorBalanceOrig", "errorBalanceDest"] {
        let overall = nonzero_fraction(&df, column)?;
        let fraud_only = fraud_nonzero_fraction(&df, column)?;
        print_info(&format!(
            "{} non-zero on {:.2}% of all rows, {:.2}% of fraud rows",
            column,
            overall * 100.0,
            fraud_only * 100.0
        ));
    }

    let model_frame = build_model_frame(&df)?;
    let prevalence = label_prevalence(&model_frame)?;

    println!();
    print_count("modeling rows (TRANSFER + CASH_OUT)", model_frame.height(), None);
    print_info(&format!(
        "Fraud prevalence in modeling rows: {:.6} ({:.2}%)",
        prevalence,
        prevalence * 100.0
    ));

    summary.model_rows = model_frame.height();
    summary.model_fraud_ratio = prevalence;
    let feature_elapsed = step_start.elapsed();
    summary.set_feature_time(feature_elapsed);
    print_step_time(feature_elapsed);

    // Step 5: Correlation structure of the features and the label
    print_step_header(5, "Feature correlation");

    let step_start = Instant::now();
    let corr_columns: Vec<&str> = MODEL_FEATURES
        .iter()
        .copied()
        .chain(std::iter::once(LABEL_COLUMN))
        .collect();
    let (matrix, names) = correlation_matrix(&model_frame, &corr_columns)?;

    if !cli.no_charts {
        correlation_heatmap(&matrix, &names);
    }
    print_label_correlations(&label_correlations(&matrix, &names, LABEL_COLUMN));

    let correlation_elapsed = step_start.elapsed();
    summary.set_correlation_time(correlation_elapsed);
    print_step_time(correlation_elapsed);

    // Step 6: Train the random forest and rank the features
    print_step_header(6, "Random forest");

    let step_start = Instant::now();
    let data = Dataset::from_frame(&model_frame, &MODEL_FEATURES, LABEL_COLUMN)?;
    let split = data.stratified_split(cli.test_fraction, cli.seed)?;

    print_info(&format!(
        "Train: {} rows ({:.2}% fraud), test: {} rows ({:.2}% fraud)",
        split.train.n_samples(),
        split.train.positive_ratio() * 100.0,
        split.test.n_samples(),
        split.test.positive_ratio() * 100.0
    ));

    println!();
    let spinner = create_spinner(&format!(
        "Growing {} trees with balanced class weights...",
        cli.trees
    ));
    let config = ForestConfig {
        n_trees: cli.trees,
        seed: cli.seed,
        ..Default::default()
    };
    let mut forest = RandomForest::new(config);
    forest.fit(&split.train)?;
    finish_with_success(&spinner, "Random forest fitted");

    let ranking = forest.feature_importance_ranking();
    print_feature_importances(&ranking);
    if !cli.no_charts {
        bar_chart("Feature importance", &ranking, 4);
    }

    summary.train_rows = split.train.n_samples();
    summary.test_rows = split.test.n_samples();
    summary.trees = forest.n_trees();
    let training_elapsed = step_start.elapsed();
    summary.set_training_time(training_elapsed);
    print_step_time(training_elapsed);

    // Display summary
    summary.display();

    // Final completion message
    print_completion();

    Ok(())
}
