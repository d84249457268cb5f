// In crates/strategies/src/trend.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::analysis::{CrossSignal, SlopeDirection, TrendLabel};
use crate::sma::SmaSeries;

/// Compares the last two defined values of an SMA series.
pub fn slope_direction(sma: &SmaSeries) -> SlopeDirection {
    match (sma.latest(), sma.previous()) {
        (Some(last), Some(prev)) if last > prev => SlopeDirection::Up,
        (Some(last), Some(prev)) if last < prev => SlopeDirection::Down,
        _ => SlopeDirection::Flat,
    }
}

/// The unrounded latest readings both rule tables are evaluated against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendInputs {
    pub short: Decimal,
    pub long: Decimal,
    pub short_slope: SlopeDirection,
    pub long_slope: SlopeDirection,
}

struct TrendRule {
    applies: fn(&TrendInputs) -> bool,
    label: TrendLabel,
}

// Evaluated top to bottom, first match wins.
const TREND_RULES: &[TrendRule] = &[
    TrendRule {
        applies: |i| i.short > i.long && i.short_slope == SlopeDirection::Up,
        label: TrendLabel::Uptrend,
    },
    TrendRule {
        applies: |i| i.short > i.long && i.long_slope == SlopeDirection::Up,
        label: TrendLabel::GentleUptrend,
    },
    TrendRule {
        applies: |i| i.short > i.long,
        label: TrendLabel::ShortTermPullback,
    },
    TrendRule {
        applies: |i| i.short < i.long && i.short_slope == SlopeDirection::Down,
        label: TrendLabel::Downtrend,
    },
    TrendRule {
        applies: |i| i.short < i.long && i.long_slope == SlopeDirection::Down,
        label: TrendLabel::GentleDowntrend,
    },
    TrendRule {
        applies: |i| i.short < i.long,
        label: TrendLabel::ShortTermRebound,
    },
];

pub fn classify_trend(inputs: &TrendInputs) -> TrendLabel {
    TREND_RULES
        .iter()
        .find(|rule| (rule.applies)(inputs))
        .map(|rule| rule.label)
        .unwrap_or(TrendLabel::RangeBound)
}

/// Short and long SMA values on the bar before the latest one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviousReadings {
    pub short: Decimal,
    pub long: Decimal,
}

struct CrossRule {
    applies: fn(&PreviousReadings, &TrendInputs) -> bool,
    signal: fn(NaiveDate) -> CrossSignal,
}

const CROSS_RULES: &[CrossRule] = &[
    CrossRule {
        applies: |prev, now| prev.short <= prev.long && now.short > now.long,
        signal: CrossSignal::GoldenCross,
    },
    CrossRule {
        applies: |prev, now| prev.short >= prev.long && now.short < now.long,
        signal: CrossSignal::DeadCross,
    },
];

/// Detects a crossover between the previous and the latest readings.
///
/// Without previous readings for both averages there is nothing to cross.
pub fn classify_cross(
    previous: Option<PreviousReadings>,
    latest: &TrendInputs,
    latest_date: NaiveDate,
) -> CrossSignal {
    let Some(previous) = previous else {
        return CrossSignal::NoSignal;
    };

    CROSS_RULES
        .iter()
        .find(|rule| (rule.applies)(&previous, latest))
        .map(|rule| (rule.signal)(latest_date))
        .unwrap_or(CrossSignal::NoSignal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sma::compute_sma;
    use crate::analysis::SlopeDirection::{Down, Flat, Up};
    use rust_decimal_macros::dec;

    fn inputs(short: Decimal, long: Decimal, short_slope: SlopeDirection, long_slope: SlopeDirection) -> TrendInputs {
        TrendInputs { short, long, short_slope, long_slope }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
    }

    #[test]
    fn test_slope_needs_two_defined_values() {
        assert_eq!(slope_direction(&compute_sma(&[dec!(1), dec!(2)], 2)), Flat);
        assert_eq!(slope_direction(&compute_sma(&[dec!(1)], 3)), Flat);
    }

    #[test]
    fn test_slope_compares_last_two_values() {
        assert_eq!(slope_direction(&compute_sma(&[dec!(1), dec!(2), dec!(3)], 2)), Up);
        assert_eq!(slope_direction(&compute_sma(&[dec!(3), dec!(2), dec!(1)], 2)), Down);
        assert_eq!(slope_direction(&compute_sma(&[dec!(1), dec!(2), dec!(1)], 2)), Flat);
        assert_eq!(slope_direction(&compute_sma(&[dec!(5), dec!(5), dec!(5)], 1)), Flat);
    }

    #[test]
    fn test_short_above_long_rules() {
        assert_eq!(classify_trend(&inputs(dec!(2), dec!(1), Up, Down)), TrendLabel::Uptrend);
        assert_eq!(classify_trend(&inputs(dec!(2), dec!(1), Flat, Up)), TrendLabel::GentleUptrend);
        assert_eq!(classify_trend(&inputs(dec!(2), dec!(1), Down, Up)), TrendLabel::GentleUptrend);
        assert_eq!(classify_trend(&inputs(dec!(2), dec!(1), Down, Flat)), TrendLabel::ShortTermPullback);
        assert_eq!(classify_trend(&inputs(dec!(2), dec!(1), Flat, Flat)), TrendLabel::ShortTermPullback);
    }

    #[test]
    fn test_short_below_long_rules() {
        assert_eq!(classify_trend(&inputs(dec!(1), dec!(2), Down, Up)), TrendLabel::Downtrend);
        assert_eq!(classify_trend(&inputs(dec!(1), dec!(2), Flat, Down)), TrendLabel::GentleDowntrend);
        assert_eq!(classify_trend(&inputs(dec!(1), dec!(2), Up, Down)), TrendLabel::GentleDowntrend);
        assert_eq!(classify_trend(&inputs(dec!(1), dec!(2), Up, Flat)), TrendLabel::ShortTermRebound);
    }

    #[test]
    fn test_equal_averages_are_range_bound() {
        assert_eq!(classify_trend(&inputs(dec!(3), dec!(3), Up, Up)), TrendLabel::RangeBound);
        assert_eq!(classify_trend(&inputs(dec!(3), dec!(3), Down, Down)), TrendLabel::RangeBound);
    }

    #[test]
    fn test_golden_cross_from_touching() {
        let prev = PreviousReadings { short: dec!(10), long: dec!(10) };
        let signal = classify_cross(Some(prev), &inputs(dec!(11), dec!(10.5), Up, Up), date());
        assert_eq!(signal, CrossSignal::GoldenCross(date()));
    }

    #[test]
    fn test_dead_cross() {
        let prev = PreviousReadings { short: dec!(12), long: dec!(10) };
        let signal = classify_cross(Some(prev), &inputs(dec!(9), dec!(10), Down, Flat), date());
        assert_eq!(signal, CrossSignal::DeadCross(date()));
    }

    #[test]
    fn test_no_cross_when_side_unchanged() {
        let prev = PreviousReadings { short: dec!(12), long: dec!(10) };
        let signal = classify_cross(Some(prev), &inputs(dec!(13), dec!(10), Up, Flat), date());
        assert_eq!(signal, CrossSignal::NoSignal);

        let touching = classify_cross(Some(prev), &inputs(dec!(10), dec!(10), Down, Flat), date());
        assert_eq!(touching, CrossSignal::NoSignal);
    }

    #[test]
    fn test_slope_is_flat_for_equal_fractional_windows() {
        let sma = compute_sma(&[dec!(0.1), dec!(0.2), dec!(0.7), dec!(0.1)], 3);
        assert_eq!(slope_direction(&sma), Flat);
    }

    #[test]
    fn test_no_cross_without_previous_readings() {
        let signal = classify_cross(None, &inputs(dec!(11), dec!(10), Up, Up), date());
        assert_eq!(signal, CrossSignal::NoSignal);
    }
}
