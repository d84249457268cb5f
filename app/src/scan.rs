// In app/src/scan.rs

use anyhow::{Context, Result};
use core_types::Symbol;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use strategies::{Analyzer, TrendAnalysis};

use crate::analyze_loaded;
use crate::loader::load_klines;

/// Every `*.csv` file in `dir`, sorted by name.
pub fn price_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    files.sort();
    Ok(files)
}

pub fn symbol_for(path: &Path) -> Symbol {
    Symbol(
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    )
}

/// Analyzes every price file in parallel. Results are sorted by symbol.
pub fn scan_directory<A>(dir: &Path, analyzer: &A) -> Result<Vec<(Symbol, TrendAnalysis)>>
where
    A: Analyzer + Sync,
{
    let files = price_files(dir)?;
    tracing::info!(files = files.len(), dir = %dir.display(), "Scanning price files");

    let mut results = files
        .par_iter()
        .map(|path| {
            let symbol = symbol_for(path);
            let (_, analysis) = analyze_loaded(analyzer, load_klines(path))
                .with_context(|| format!("Failed to analyze {symbol}"))?;
            Ok((symbol, analysis))
        })
        .collect::<Result<Vec<_>>>()?;

    results.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strategies::{AnalysisErrorKind, TrendClassifier, TrendSettings};
    use tempfile::tempdir;

    fn write_series(dir: &Path, name: &str, closes: &[u32]) {
        let mut data = String::from("Date,Open,High,Low,Close\n");
        for (i, close) in closes.iter().enumerate() {
            data.push_str(&format!("2024-02-{:02},{close},{close},{close},{close}\n", i + 1));
        }
        fs::write(dir.join(name), data).unwrap();
    }

    #[test]
    fn test_scan_analyzes_each_csv() {
        let dir = tempdir().unwrap();
        write_series(dir.path(), "UP.csv", &[1, 2, 3, 4, 5, 6]);
        write_series(dir.path(), "FLAT.csv", &[7, 7, 7, 7, 7, 7]);
        write_series(dir.path(), "SHORT.csv", &[1, 2]);
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join("BROKEN.csv"), "Date,Open\n2024-02-01,1\n").unwrap();

        let classifier = TrendClassifier::new(TrendSettings { short_window: 2, long_window: 4 });
        let results = scan_directory(dir.path(), &classifier).unwrap();

        let symbols: Vec<&str> = results.iter().map(|(s, _)| s.0.as_str()).collect();
        assert_eq!(symbols, vec!["BROKEN", "FLAT", "SHORT", "UP"]);

        assert_eq!(results[0].1.error_kind(), Some(AnalysisErrorKind::InvalidInput));
        assert_eq!(results[1].1.trend_label(), "range-bound");
        assert_eq!(results[2].1.error_kind(), Some(AnalysisErrorKind::InsufficientData));
        assert_eq!(results[3].1.trend_label(), "possible uptrend");
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let classifier = TrendClassifier::default();
        assert!(scan_directory(&dir.path().join("nope"), &classifier).is_err());
    }
}
