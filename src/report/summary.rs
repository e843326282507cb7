//! Run summary report generation

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;
use std::path::PathBuf;
use std::time::Duration;

/// Summary of one analysis run, filled in stage by stage
#[derive(Debug, Default)]
pub struct RunSummary {
    pub ledger_rows: usize,
    pub ledger_columns: usize,
    pub fraud_rows: usize,
    pub fraud_ratio: f64,
    pub sample_rows: usize,
    pub sample_path: Option<PathBuf>,
    pub model_rows: usize,
    pub model_fraud_ratio: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub trees: usize,
    pub load_time: Duration,
    pub profile_time: Duration,
    pub feature_time: Duration,
    pub correlation_time: Duration,
    pub training_time: Duration,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_load_time(&mut self, elapsed: Duration) {
        self.load_time = elapsed;
    }

    pub fn set_profile_time(&mut self, elapsed: Duration) {
        self.profile_time = elapsed;
    }

    pub fn set_feature_time(&mut self, elapsed: Duration) {
        self.feature_time = elapsed;
    }

    pub fn set_correlation_time(&mut self, elapsed: Duration) {
        self.correlation_time = elapsed;
    }

    pub fn set_training_time(&mut self, elapsed: Duration) {
        self.training_time = elapsed;
    }

    pub fn total_time(&self) -> Duration {
        self.load_time
            + self.profile_time
            + self.feature_time
            + self.correlation_time
            + self.training_time
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("RUN SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Ledger rows"),
            Cell::new(self.ledger_rows),
        ]);
        table.add_row(vec![
            Cell::new("🧾 Ledger columns"),
            Cell::new(self.ledger_columns),
        ]);
        table.add_row(vec![
            Cell::new("🚨 Fraud rows"),
            Cell::new(self.fraud_rows).fg(if self.fraud_rows == 0 {
                Color::White
            } else {
                Color::Red
            }),
        ]);
        table.add_row(vec![
            Cell::new("📉 Fraud ratio"),
            Cell::new(format!("{:.6}", self.fraud_ratio)),
        ]);
        table.add_row(vec![
            Cell::new("💾 EDA sample rows"),
            Cell::new(self.sample_rows),
        ]);
        table.add_row(vec![
            Cell::new("🎯 Model rows (TRANSFER + CASH_OUT)"),
            Cell::new(self.model_rows),
        ]);
        table.add_row(vec![
            Cell::new("⚖️  Model fraud ratio"),
            Cell::new(format!("{:.6}", self.model_fraud_ratio)),
        ]);
        table.add_row(vec![
            Cell::new("🧮 Train / test rows"),
            Cell::new(format!("{} / {}", self.train_rows, self.test_rows)),
        ]);
        table.add_row(vec![
            Cell::new("🌲 Trees grown"),
            Cell::new(self.trees)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        print_rows(&table);

        let mut timings = Table::new();
        timings.load_preset(UTF8_FULL_CONDENSED);
        timings.set_header(vec![
            Cell::new("Stage").add_attribute(Attribute::Bold),
            Cell::new("Time").add_attribute(Attribute::Bold),
        ]);
        timings.add_row(vec![Cell::new("Load"), duration_cell(self.load_time)]);
        timings.add_row(vec![
            Cell::new("Profile & sample"),
            duration_cell(self.profile_time),
        ]);
        timings.add_row(vec![
            Cell::new("Features"),
            duration_cell(self.feature_time),
        ]);
        timings.add_row(vec![
            Cell::new("Correlation"),
            duration_cell(self.correlation_time),
        ]);
        timings.add_row(vec![
            Cell::new("Training"),
            duration_cell(self.training_time),
        ]);
        timings.add_row(vec![
            Cell::new("Total").add_attribute(Attribute::Bold),
            duration_cell(self.total_time()).add_attribute(Attribute::Bold),
        ]);

        println!();
        print_rows(&timings);

        if let Some(path) = &self.sample_path {
            println!();
            println!(
                "    {} EDA sample written to {}",
                style("💾").cyan(),
                style(path.display()).underlined()
            );
        }
    }
}

fn duration_cell(elapsed: Duration) -> Cell {
    Cell::new(format!("{:.2}s", elapsed.as_secs_f64()))
}

fn print_rows(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}
