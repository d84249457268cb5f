// In crates/strategies/src/lib.rs

use core_types::Kline;

pub mod analysis;
pub mod classifier;
pub mod sma;
pub mod trend;
pub mod types;

pub use analysis::{
    AnalysisErrorKind, AnalysisFailure, CrossSignal, SlopeDirection, SmaReading, TrendAnalysis,
    TrendLabel, TrendReport,
};
pub use classifier::{TrendClassifier, analyze};
pub use sma::{SmaSeries, compute_sma};
pub use trend::slope_direction;
pub use types::TrendSettings;

/// The universal interface for a price-series analyzer.
///
/// An analyzer reads a slice of bars and reports what it sees. It never
/// fails: problems with the input are part of the returned `TrendAnalysis`.
pub trait Analyzer {
    /// The name of the analyzer.
    fn name(&self) -> &'static str;

    fn analyze(&self, klines: &[Kline]) -> TrendAnalysis;
}
