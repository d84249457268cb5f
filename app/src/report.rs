// In app/src/report.rs

use core_types::{Kline, Symbol};
use strategies::analysis::DATE_FORMAT;
use strategies::{CrossSignal, SmaReading, TrendAnalysis, TrendSettings};

/// Renders an analysis the way the terminal report shows it.
pub fn render_analysis(symbol: &Symbol, settings: &TrendSettings, analysis: &TrendAnalysis) -> String {
    let mut lines = vec![format!("== {symbol} technical analysis ==")];

    match analysis {
        TrendAnalysis::Failed(failure) => {
            lines.push(format!(
                "[!] Analysis error: {} ({})",
                failure.kind,
                failure.kind.trend_label()
            ));
            if let Some(date) = failure.latest_date {
                lines.push(format!("    latest data: {}", date.format(DATE_FORMAT)));
            }
        }
        TrendAnalysis::Complete(report) => {
            lines.push(format!("Trend ({})", report.latest_date.format(DATE_FORMAT)));
            lines.push(format!("    {}", report.trend));
            lines.push("Signal".to_string());
            lines.push(format!("{} {}", signal_marker(&report.signal), report.signal));
            lines.push(metric_line("Short", settings.short_window, &report.short_sma));
            lines.push(metric_line("Long", settings.long_window, &report.long_sma));
        }
    }

    to_block(lines)
}

// One line per entry, each terminated by a newline.
fn to_block(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

fn signal_marker(signal: &CrossSignal) -> &'static str {
    match signal {
        CrossSignal::GoldenCross(_) => "[+]",
        CrossSignal::DeadCross(_) => "[!]",
        CrossSignal::NoSignal => "[i]",
    }
}

fn metric_line(label: &str, window: usize, reading: &SmaReading) -> String {
    format!(
        "{label} SMA ({window} bars): {:.2}  slope: {}",
        reading.latest, reading.slope
    )
}

/// One summary line per ticker for the `scan` command.
pub fn render_scan_line(symbol: &Symbol, analysis: &TrendAnalysis) -> String {
    let date = analysis
        .latest_date()
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "N/A".to_string());
    format!(
        "{:<10} {:<10} {:<40} {}",
        symbol.0,
        date,
        analysis.trend_label(),
        analysis.signal_message()
    )
}

/// The raw bars as a fixed-width table.
pub fn render_klines(klines: &[Kline]) -> String {
    let header = format!(
        "{:<10} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "Date", "Open", "High", "Low", "Close", "Volume"
    );
    let rows = klines.iter().map(|k| {
        format!(
            "{:<10} {:>12} {:>12} {:>12} {:>12} {:>14}",
            k.date().format(DATE_FORMAT).to_string(),
            k.open,
            k.high,
            k.low,
            k.close,
            k.volume
        )
    });
    to_block(std::iter::once(header).chain(rows).collect())
}
