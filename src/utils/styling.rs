//! Terminal styling utilities for a modern, visually appealing TUI

use console::{style, Emoji};
use std::path::Path;
use std::time::Duration;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");

/// Print the application banner with ASCII art
pub fn print_banner(version: &str) {
    let banner = r#"
    █▀▀ █▀█ ▄▀█ █░█ █▀▄ █▀ █ █▀▀ █░█ ▀█▀
    █▀░ █▀▄ █▀█ █▄█ █▄▀ ▄█ █ █▄█ █▀█ ░█░
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {} {}",
        style("◉").magenta().bold(),
        style("Mobile money ledgers, profiled and classified").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(
    input: &Path,
    sample_output: &Path,
    sample_cap: usize,
    trees: usize,
    test_fraction: f64,
    seed: u64,
) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    print_config_row("Configuration", "");
    println!("    ├{}┤", line);
    print_config_row("Ledger:", &truncate_path(input, 35));
    print_config_row("EDA sample:", &truncate_path(sample_output, 35));
    println!("    ├{}┤", line);
    print_config_row("Trees:", &trees.to_string());
    print_config_row("Test fraction:", &format!("{:.2}", test_fraction));
    print_config_row("Sample cap:", &sample_cap.to_string());
    print_config_row("Seed:", &seed.to_string());
    println!("    └{}┘", line);
    println!();
}

// Pad before styling so ANSI escapes don't throw off the box alignment
fn print_config_row(label: &str, value: &str) {
    let pad = 54usize.saturating_sub(2 + 15 + value.chars().count());
    println!(
        "    │  {:<15}{}{}│",
        label,
        style(value).yellow(),
        " ".repeat(pad)
    );
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print the elapsed time for a pipeline step
pub fn print_step_time(elapsed: Duration) {
    println!(
        "    {}",
        style(format!("⏱ {:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Fraudsight analysis complete!").green().bold()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, threshold_info: Option<&str>) {
    if let Some(info) = threshold_info {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!(
            "      Found {} {}",
            style(count).yellow().bold(),
            description
        );
    }
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let tail: String = s
            .chars()
            .rev()
            .take(max_len.saturating_sub(3))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("...{}", tail)
    }
}
