// In crates/strategies/src/classifier.rs

use core_types::{Kline, PriceSeries};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::analysis::{AnalysisErrorKind, SmaReading, TrendAnalysis, TrendReport};
use crate::sma::{SmaSeries, compute_sma};
use crate::trend::{PreviousReadings, TrendInputs, classify_cross, classify_trend, slope_direction};
use crate::types::TrendSettings;
use crate::Analyzer;

/// Classifies trend and crossover state from a short and a long SMA.
#[derive(Debug, Clone, Default)]
pub struct TrendClassifier {
    settings: TrendSettings,
}

impl TrendClassifier {
    pub fn new(settings: TrendSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &TrendSettings {
        &self.settings
    }
}

impl Analyzer for TrendClassifier {
    fn name(&self) -> &'static str {
        "SmaTrendCrossover"
    }

    fn analyze(&self, klines: &[Kline]) -> TrendAnalysis {
        analyze(klines, self.settings.short_window, self.settings.long_window)
    }
}

/// Runs the full trend and crossover classification over `klines`.
///
/// The checks run in a fixed order: series validity, then length against
/// `long_window`, then whether both averages produced a latest value. The
/// first one that fails decides the reported error kind.
pub fn analyze(klines: &[Kline], short_window: usize, long_window: usize) -> TrendAnalysis {
    let series = match PriceSeries::from_klines(klines) {
        Ok(series) => series,
        Err(err) => {
            warn!(error = %err, "Rejecting price series");
            return TrendAnalysis::failed(AnalysisErrorKind::InvalidInput, None);
        }
    };

    let latest_date = series.latest_date();

    if series.len() < long_window {
        debug!(bars = series.len(), long_window, "Not enough bars for the long window");
        return TrendAnalysis::failed(AnalysisErrorKind::InsufficientData, latest_date);
    }

    let closes = series.closes();
    let short_sma = compute_sma(&closes, short_window);
    let long_sma = compute_sma(&closes, long_window);

    let (Some(short), Some(long), Some(date)) = (short_sma.latest(), long_sma.latest(), latest_date)
    else {
        debug!(short_window, long_window, "Moving averages have no latest value");
        return TrendAnalysis::failed(AnalysisErrorKind::InsufficientSmaData, latest_date);
    };

    let latest = TrendInputs {
        short,
        long,
        short_slope: slope_direction(&short_sma),
        long_slope: slope_direction(&long_sma),
    };

    let previous = match (short_sma.previous(), long_sma.previous()) {
        (Some(short), Some(long)) => Some(PreviousReadings { short, long }),
        _ => None,
    };

    let trend = classify_trend(&latest);
    let signal = classify_cross(previous, &latest, date);

    debug!(
        %short,
        %long,
        short_slope = %latest.short_slope,
        long_slope = %latest.long_slope,
        trend = %trend,
        signal = %signal,
        "Trend analysis complete"
    );

    TrendAnalysis::Complete(TrendReport {
        short_sma: reading(&short_sma, short, latest.short_slope),
        long_sma: reading(&long_sma, long, latest.long_slope),
        trend,
        signal,
        latest_date: date,
    })
}

// Rounds half to even, so 2.675 reports as 2.68 and 2.665 as 2.66.
fn reading(sma: &SmaSeries, latest: Decimal, slope: crate::SlopeDirection) -> SmaReading {
    SmaReading {
        window: sma.window(),
        latest: latest.round_dp(2),
        slope,
    }
}
