//! Terminal charts for the profiling report
//!
//! Everything renders straight to stdout with unicode bars, no plotting
//! backend. Amounts span six orders of magnitude, so the histogram uses
//! log-spaced bins and log-scaled bar lengths.

use console::style;
use faer::Mat;

const BAR_WIDTH: usize = 40;

/// Horizontal bar chart of labeled non-negative values, scaled against the
/// largest one. `precision` sets the decimal places on the printed value.
pub fn bar_chart(title: &str, entries: &[(String, f64)], precision: usize) {
    if entries.is_empty() {
        return;
    }

    println!();
    println!(
        "    {} {}",
        style("✧").cyan(),
        style(title).white().bold()
    );

    let max_value = entries.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);
    let label_width = entries
        .iter()
        .map(|(l, _)| l.chars().count())
        .max()
        .unwrap_or(8);

    for (label, value) in entries {
        let fraction = if max_value > 0.0 {
            value / max_value
        } else {
            0.0
        };
        let bar_len = (fraction * BAR_WIDTH as f64).round() as usize;
        println!(
            "      {:>width$} │{:<bar$}│ {:.prec$}",
            label,
            "█".repeat(bar_len),
            value,
            width = label_width,
            bar = BAR_WIDTH,
            prec = precision
        );
    }
}

/// Log-log histogram of transaction amounts.
///
/// Bins are log-spaced between the smallest and largest positive amount;
/// non-positive amounts cannot sit on a log axis and are counted separately
/// below the chart. Bar lengths scale with log10(count + 1) so the rare
/// upper tail stays visible next to million-row bins. Empty bins are
/// omitted.
pub fn amount_histogram(values: &[f64], bins: usize) {
    println!();
    println!(
        "    {} {}",
        style("✧").cyan(),
        style("Transaction amounts (log-log)").white().bold()
    );

    let positive: Vec<f64> = values.iter().copied().filter(|v| *v > 0.0).collect();
    let excluded = values.len() - positive.len();

    if positive.is_empty() || bins == 0 {
        println!("      {}", style("no positive amounts to plot").dim());
        return;
    }

    let min = positive.iter().copied().fold(f64::INFINITY, f64::min);
    let max = positive.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let edges = log_bin_edges(min, max, bins);

    let mut counts = vec![0usize; bins];
    for &value in &positive {
        counts[bin_index(value, &edges, bins)] += 1;
    }

    let max_count = counts.iter().copied().max().unwrap_or(1);
    let log_max = ((max_count + 1) as f64).log10();

    for (i, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let bar_len = if log_max > 0.0 {
            ((((count + 1) as f64).log10() / log_max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        println!(
            "      [{:>9.3e}, {:>9.3e}) │{:<bar$}│ {}",
            edges[i],
            edges[i + 1],
            "█".repeat(bar_len),
            count,
            bar = BAR_WIDTH
        );
    }

    println!(
        "      {}",
        style(format!("{} log-spaced bins, empty bins omitted", bins)).dim()
    );
    if excluded > 0 {
        println!(
            "      {}",
            style(format!("{} non-positive amounts excluded", excluded)).dim()
        );
    }
}

/// Correlation heatmap as a numeric grid.
///
/// Column headers use [k] indices with a legend above, since the feature
/// names are too long to truncate unambiguously. Positive cells render red,
/// negative cells blue, and |r| >= 0.5 is bold.
pub fn correlation_heatmap(matrix: &Mat<f64>, labels: &[String]) {
    let n = matrix.nrows().min(labels.len());
    if n == 0 {
        return;
    }

    println!();
    println!(
        "    {} {}",
        style("✧").cyan(),
        style("Feature correlation heatmap").white().bold()
    );

    for (i, label) in labels.iter().enumerate().take(n) {
        println!("      {} {}", style(format!("[{:>2}]", i + 1)).dim(), label);
    }
    println!();

    print!("      {:>4}", "");
    for j in 0..n {
        print!(" {:>5}", format!("[{}]", j + 1));
    }
    println!();

    for i in 0..n {
        print!("      {:>4}", format!("[{}]", i + 1));
        for j in 0..n {
            let value = matrix[(i, j)];
            let cell = format!(" {:>5.2}", value);
            let styled = if i == j {
                style(cell).dim()
            } else if value.abs() >= 0.5 {
                if value > 0.0 {
                    style(cell).red().bold()
                } else {
                    style(cell).blue().bold()
                }
            } else if value > 0.0 {
                style(cell).red()
            } else if value < 0.0 {
                style(cell).blue()
            } else {
                style(cell).dim()
            };
            print!("{}", styled);
        }
        println!();
    }
}

/// Edges of `bins` log-spaced intervals covering [min, max]
fn log_bin_edges(min: f64, max: f64, bins: usize) -> Vec<f64> {
    let log_min = min.log10();
    let span = (max.log10() - log_min).max(f64::EPSILON);

    (0..=bins)
        .map(|i| 10f64.powf(log_min + span * i as f64 / bins as f64))
        .collect()
}

/// Bin index for a value, clamped so max lands in the last bin
fn bin_index(value: f64, edges: &[f64], bins: usize) -> usize {
    let log_min = edges[0].log10();
    let log_max = edges[bins].log10();
    let span = (log_max - log_min).max(f64::EPSILON);
    let position = (value.log10() - log_min) / span * bins as f64;
    (position as usize).min(bins - 1)
}
