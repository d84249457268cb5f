// In app/src/main.rs

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use core_types::{Kline, Symbol};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use strategies::{AnalysisErrorKind, Analyzer, TrendAnalysis, TrendClassifier, TrendSettings};
use tracing_subscriber::prelude::*;

mod loader;
mod overlay;
mod report;
mod scan;

use crate::loader::{LoadError, filter_range, load_klines};
use crate::overlay::Overlay;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Moving-average trend and crossover analysis for price histories.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Moving-average windows shared by every subcommand. Unset values fall back
/// to the `[analysis]` settings.
#[derive(clap::Args, Debug)]
struct WindowArgs {
    /// Short SMA window, in bars.
    #[arg(long)]
    short: Option<usize>,

    /// Long SMA window, in bars.
    #[arg(long)]
    long: Option<usize>,
}

impl WindowArgs {
    fn resolve(&self, defaults: TrendSettings) -> TrendSettings {
        TrendSettings {
            short_window: self.short.unwrap_or(defaults.short_window),
            long_window: self.long.unwrap_or(defaults.long_window),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyzes one price history and prints the trend report.
    Analyze {
        /// CSV file with Date, Open, High, Low, Close columns.
        #[arg(short, long)]
        file: PathBuf,

        /// Symbol shown in the report. Defaults to the file name.
        #[arg(short, long)]
        symbol: Option<String>,

        #[command(flatten)]
        windows: WindowArgs,

        /// First date to include, in YYYY-MM-DD format.
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last date to include, in YYYY-MM-DD format.
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Print the analysis as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Also print the loaded bars.
        #[arg(long)]
        show_data: bool,
    },

    /// Writes the candle and SMA columns a chart would plot.
    Overlay {
        #[arg(short, long)]
        file: PathBuf,

        /// Destination CSV file.
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        windows: WindowArgs,
    },

    /// Analyzes every CSV file in a directory.
    Scan {
        #[arg(short, long)]
        dir: PathBuf,

        #[command(flatten)]
        windows: WindowArgs,
    },
}

// --- Main Application Entry Point ---

fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments before any settings are read.
    let cli = Cli::parse();

    let settings = app_config::load_settings().context("Failed to load settings")?;

    let level = settings
        .app
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(tracing_subscriber::filter::Targets::new().with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::debug!(environment = %settings.app.environment, "Settings loaded");

    match cli.command {
        Commands::Analyze {
            file,
            symbol,
            windows,
            start,
            end,
            json,
            show_data,
        } => {
            let symbol = symbol.map(Symbol).unwrap_or_else(|| scan::symbol_for(&file));
            let trend_settings = windows.resolve(settings.analysis);
            handle_analyze(&file, &symbol, trend_settings, (start, end), json, show_data)?;
        }
        Commands::Overlay { file, output, windows } => {
            handle_overlay(&file, &output, windows.resolve(settings.analysis))?;
        }
        Commands::Scan { dir, windows } => {
            handle_scan(&dir, windows.resolve(settings.analysis))?;
        }
    }

    Ok(())
}

/// Runs `analyzer` over freshly loaded bars.
///
/// A file that was read but does not hold a price table becomes an
/// `InvalidInput` analysis so the report still renders. I/O failures are
/// returned as errors.
pub(crate) fn analyze_loaded<A: Analyzer + ?Sized>(
    analyzer: &A,
    loaded: std::result::Result<Vec<Kline>, LoadError>,
) -> Result<(Vec<Kline>, TrendAnalysis)> {
    match loaded {
        Ok(klines) => {
            let analysis = analyzer.analyze(&klines);
            Ok((klines, analysis))
        }
        Err(err) if err.is_format_error() => {
            tracing::warn!(error = %err, "Price data could not be parsed");
            Ok((Vec::new(), TrendAnalysis::failed(AnalysisErrorKind::InvalidInput, None)))
        }
        Err(err) => Err(err.into()),
    }
}

fn handle_analyze(
    file: &Path,
    symbol: &Symbol,
    settings: TrendSettings,
    (start, end): (Option<NaiveDate>, Option<NaiveDate>),
    json: bool,
    show_data: bool,
) -> Result<()> {
    let classifier = TrendClassifier::new(settings);
    tracing::info!(%symbol, analyzer = classifier.name(), ?settings, "Analyzing price history");

    let loaded = load_klines(file).map(|klines| filter_range(klines, start, end));
    let (klines, analysis) = analyze_loaded(&classifier, loaded)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print!("{}", report::render_analysis(symbol, &settings, &analysis));
    }

    if show_data {
        println!();
        print!("{}", report::render_klines(&klines));
    }

    Ok(())
}

fn handle_overlay(file: &Path, output: &Path, settings: TrendSettings) -> Result<()> {
    let klines = load_klines(file)?;
    let overlay = Overlay::build(&klines, &settings)?;

    let out = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    overlay.write_csv(BufWriter::new(out))?;

    tracing::info!(bars = klines.len(), output = %output.display(), "Overlay written");
    Ok(())
}

fn handle_scan(dir: &Path, settings: TrendSettings) -> Result<()> {
    let classifier = TrendClassifier::new(settings);
    let results = scan::scan_directory(dir, &classifier)?;

    for (symbol, analysis) in &results {
        println!("{}", report::render_scan_line(symbol, analysis));
    }

    tracing::info!(tickers = results.len(), "Scan finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_becomes_invalid_input() {
        let loaded = loader::read_klines("Date,Open\n2024-01-01,1\n".as_bytes());
        let (klines, analysis) = analyze_loaded(&TrendClassifier::default(), loaded).unwrap();
        assert!(klines.is_empty());
        assert_eq!(analysis.error_kind(), Some(AnalysisErrorKind::InvalidInput));
    }

    #[test]
    fn test_io_error_is_propagated() {
        let loaded = load_klines(Path::new("/definitely/not/here.csv"));
        assert!(analyze_loaded(&TrendClassifier::default(), loaded).is_err());
    }

    #[test]
    fn test_window_flags_override_settings() {
        let args = WindowArgs { short: Some(10), long: None };
        let resolved = args.resolve(TrendSettings::default());
        assert_eq!(resolved, TrendSettings { short_window: 10, long_window: 25 });
    }

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::parse_from([
            "sma-trend", "analyze", "--file", "AAPL.csv", "--long", "50", "--start", "2024-01-01", "--json",
        ]);
        match cli.command {
            Commands::Analyze { file, windows, start, json, .. } => {
                assert_eq!(file, PathBuf::from("AAPL.csv"));
                assert_eq!(windows.long, Some(50));
                assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_usage_errors_come_from_clap() {
        let missing_file = Cli::try_parse_from(["sma-trend", "analyze"]).unwrap_err();
        assert_eq!(missing_file.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let help = Cli::try_parse_from(["sma-trend", "--help"]).unwrap_err();
        assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
