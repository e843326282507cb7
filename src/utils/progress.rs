//! Spinner helpers for the long-running pipeline stages
//!
//! The load, sample, and fit steps can run for minutes on a full ledger, so
//! each gets a steady-tick spinner with an elapsed clock. The spinner itself
//! draws to stderr; the completion line goes to stdout so it lands in logs
//! and redirected output alongside the rest of the report.

use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner with an elapsed clock for a stage of unknown length
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("    {spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap()
            .tick_strings(&["⠁", "⠂", "⠄", "⡀", "⢀", "⠠", "⠐", "⠈", " "]),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Stop the spinner and record the step as completed
pub fn finish_with_success(spinner: &ProgressBar, message: &str) {
    finish(spinner, style("✓").green().bold(), message);
}

/// Stop the spinner and record the step as degraded but survivable
pub fn finish_with_warning(spinner: &ProgressBar, message: &str) {
    finish(spinner, style("!").yellow().bold(), message);
}

fn finish(spinner: &ProgressBar, prefix: StyledObject<&str>, message: &str) {
    spinner.finish_and_clear();
    println!("    {} {}", prefix, message);
}
