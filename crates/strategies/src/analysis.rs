// In crates/strategies/src/analysis.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Date format used wherever an observation date is shown to a user.
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// Direction of the two most recent defined SMA values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SlopeDirection {
    Up,
    Down,
    #[default]
    Flat,
}

impl SlopeDirection {
    pub fn symbol(self) -> &'static str {
        match self {
            SlopeDirection::Up => "↑",
            SlopeDirection::Down => "↓",
            SlopeDirection::Flat => "→",
        }
    }
}

impl fmt::Display for SlopeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendLabel {
    Uptrend,
    GentleUptrend,
    ShortTermPullback,
    Downtrend,
    GentleDowntrend,
    ShortTermRebound,
    RangeBound,
}

impl TrendLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            TrendLabel::Uptrend => "possible uptrend",
            TrendLabel::GentleUptrend => "possible gentle uptrend",
            TrendLabel::ShortTermPullback => "possible short-term pullback / caution",
            TrendLabel::Downtrend => "possible downtrend",
            TrendLabel::GentleDowntrend => "possible gentle downtrend",
            TrendLabel::ShortTermRebound => "possible short-term rebound / caution",
            TrendLabel::RangeBound => "range-bound",
        }
    }
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A crossover between the short and the long SMA on the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "date")]
pub enum CrossSignal {
    GoldenCross(NaiveDate),
    DeadCross(NaiveDate),
    NoSignal,
}

impl fmt::Display for CrossSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossSignal::GoldenCross(date) => {
                write!(f, "golden cross candidate ({})", date.format(DATE_FORMAT))
            }
            CrossSignal::DeadCross(date) => {
                write!(f, "dead cross candidate ({})", date.format(DATE_FORMAT))
            }
            CrossSignal::NoSignal => f.write_str("no signal"),
        }
    }
}

/// The latest reading of one moving average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SmaReading {
    pub window: usize,
    /// Latest value rounded to two decimal places.
    pub latest: Decimal,
    pub slope: SlopeDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub short_sma: SmaReading,
    pub long_sma: SmaReading,
    pub trend: TrendLabel,
    pub signal: CrossSignal,
    pub latest_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnalysisErrorKind {
    /// The bars do not form a valid ordered price series.
    InvalidInput,
    /// Fewer bars than the long window.
    InsufficientData,
    /// Enough bars, but a moving average still has no defined latest value.
    InsufficientSmaData,
}

impl AnalysisErrorKind {
    pub fn trend_label(self) -> &'static str {
        match self {
            AnalysisErrorKind::InvalidInput => "data format error",
            AnalysisErrorKind::InsufficientData => "insufficient data",
            AnalysisErrorKind::InsufficientSmaData => "insufficient data for SMA",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            AnalysisErrorKind::InvalidInput => {
                "input is not an ordered price series with close prices"
            }
            AnalysisErrorKind::InsufficientData => "not enough data for the long window",
            AnalysisErrorKind::InsufficientSmaData => {
                "not enough data to compute the moving averages"
            }
        }
    }
}

impl fmt::Display for AnalysisErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisFailure {
    pub kind: AnalysisErrorKind,
    pub latest_date: Option<NaiveDate>,
}

/// Outcome of one `analyze` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrendAnalysis {
    Complete(TrendReport),
    Failed(AnalysisFailure),
}

impl TrendAnalysis {
    pub fn failed(kind: AnalysisErrorKind, latest_date: Option<NaiveDate>) -> Self {
        TrendAnalysis::Failed(AnalysisFailure { kind, latest_date })
    }

    pub fn report(&self) -> Option<&TrendReport> {
        match self {
            TrendAnalysis::Complete(report) => Some(report),
            TrendAnalysis::Failed(_) => None,
        }
    }

    pub fn error_kind(&self) -> Option<AnalysisErrorKind> {
        match self {
            TrendAnalysis::Complete(_) => None,
            TrendAnalysis::Failed(failure) => Some(failure.kind),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, TrendAnalysis::Complete(_))
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        match self {
            TrendAnalysis::Complete(report) => Some(report.latest_date),
            TrendAnalysis::Failed(failure) => failure.latest_date,
        }
    }

    /// `None` means "unavailable".
    pub fn latest_short_sma(&self) -> Option<Decimal> {
        self.report().map(|r| r.short_sma.latest)
    }

    pub fn latest_long_sma(&self) -> Option<Decimal> {
        self.report().map(|r| r.long_sma.latest)
    }

    pub fn short_slope(&self) -> Option<SlopeDirection> {
        self.report().map(|r| r.short_sma.slope)
    }

    pub fn long_slope(&self) -> Option<SlopeDirection> {
        self.report().map(|r| r.long_sma.slope)
    }

    pub fn trend_label(&self) -> &'static str {
        match self {
            TrendAnalysis::Complete(report) => report.trend.as_str(),
            TrendAnalysis::Failed(failure) => failure.kind.trend_label(),
        }
    }

    pub fn signal_message(&self) -> String {
        match self {
            TrendAnalysis::Complete(report) => report.signal.to_string(),
            TrendAnalysis::Failed(_) => "N/A".to_string(),
        }
    }
}
