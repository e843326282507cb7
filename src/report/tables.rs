//! comfy-table renderers for the profiling and model reports

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{DescriptiveStats, TableProfile};

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn section(title: &str) {
    println!();
    println!(
        "    {} {}",
        style("✧").cyan(),
        style(title).white().bold()
    );
}

/// Schema table: column, dtype, null count
pub fn print_schema(profile: &TableProfile) {
    section("Schema");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Column").add_attribute(Attribute::Bold),
        Cell::new("Dtype").add_attribute(Attribute::Bold),
        Cell::new("Nulls").add_attribute(Attribute::Bold),
    ]);

    for ((name, dtype), (_, nulls)) in profile.dtypes.iter().zip(&profile.null_counts) {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(dtype),
            Cell::new(nulls).fg(if *nulls == 0 { Color::White } else { Color::Red }),
        ]);
    }

    print_indented(&table);
}

/// First rows of the ledger, transposed: one table row per ledger column.
/// Thirteen ledger columns side by side would not fit a terminal.
pub fn print_head(preview: &[(String, Vec<String>)]) {
    if preview.is_empty() {
        return;
    }
    section("First rows");

    let rows = preview.first().map(|(_, values)| values.len()).unwrap_or(0);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    let mut header = vec![Cell::new("Column").add_attribute(Attribute::Bold)];
    header.extend((0..rows).map(|row| Cell::new(row).add_attribute(Attribute::Bold)));
    table.set_header(header);

    for (name, values) in preview {
        let mut cells = vec![Cell::new(name)];
        cells.extend(values.iter().map(Cell::new));
        table.add_row(cells);
    }

    print_indented(&table);
}

/// Transaction type frequencies, most common first
pub fn print_type_counts(counts: &[(String, usize)]) {
    section("Transaction types");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Type").add_attribute(Attribute::Bold),
        Cell::new("Count").add_attribute(Attribute::Bold),
    ]);

    for (name, count) in counts {
        table.add_row(vec![Cell::new(name), Cell::new(count)]);
    }

    print_indented(&table);
}

/// Summary statistics for a set of (name, stats) columns
pub fn print_describe(title: &str, columns: &[(&str, DescriptiveStats)]) {
    section(title);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Column").add_attribute(Attribute::Bold),
        Cell::new("Count").add_attribute(Attribute::Bold),
        Cell::new("Mean").add_attribute(Attribute::Bold),
        Cell::new("Std").add_attribute(Attribute::Bold),
        Cell::new("Min").add_attribute(Attribute::Bold),
        Cell::new("25%").add_attribute(Attribute::Bold),
        Cell::new("50%").add_attribute(Attribute::Bold),
        Cell::new("75%").add_attribute(Attribute::Bold),
        Cell::new("Max").add_attribute(Attribute::Bold),
    ]);

    for (name, stats) in columns {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(stats.count),
            Cell::new(format!("{:.2}", stats.mean)),
            Cell::new(format!("{:.2}", stats.std)),
            Cell::new(format!("{:.2}", stats.min)),
            Cell::new(format!("{:.2}", stats.q25)),
            Cell::new(format!("{:.2}", stats.median)),
            Cell::new(format!("{:.2}", stats.q75)),
            Cell::new(format!("{:.2}", stats.max)),
        ]);
    }

    print_indented(&table);
}

/// Fraud rate per transaction type, highest first
pub fn print_fraud_rates(rates: &[(String, f64)]) {
    section("Fraud rate by type");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Type").add_attribute(Attribute::Bold),
        Cell::new("Fraud rate").add_attribute(Attribute::Bold),
        Cell::new("Percent").add_attribute(Attribute::Bold),
    ]);

    for (name, rate) in rates {
        let cell = Cell::new(format!("{:.6}", rate));
        let cell = if *rate > 0.0 { cell.fg(Color::Red) } else { cell };
        table.add_row(vec![
            Cell::new(name),
            cell,
            Cell::new(format!("{:.2}%", rate * 100.0)),
        ]);
    }

    print_indented(&table);
}

/// Feature correlations against the label, strongest magnitude first
pub fn print_label_correlations(ranked: &[(String, f64)]) {
    section("Correlation with isFraud");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Feature").add_attribute(Attribute::Bold),
        Cell::new("Correlation").add_attribute(Attribute::Bold),
    ]);

    for (name, correlation) in ranked {
        let color = if correlation.abs() >= 0.3 {
            Color::Yellow
        } else {
            Color::White
        };
        table.add_row(vec![
            Cell::new(name),
            Cell::new(format!("{:+.4}", correlation)).fg(color),
        ]);
    }

    print_indented(&table);
}

/// Forest feature importances, highest first
pub fn print_feature_importances(ranking: &[(String, f64)]) {
    section("Feature importance");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Rank").add_attribute(Attribute::Bold),
        Cell::new("Feature").add_attribute(Attribute::Bold),
        Cell::new("Importance").add_attribute(Attribute::Bold),
    ]);

    for (rank, (name, importance)) in ranking.iter().enumerate() {
        let cell = Cell::new(format!("{:.4}", importance));
        let cell = if rank == 0 {
            cell.fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            cell
        };
        table.add_row(vec![Cell::new(rank + 1), Cell::new(name), cell]);
    }

    print_indented(&table);
}
