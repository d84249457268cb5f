// In crates/strategies/src/sma.rs

use rust_decimal::Decimal;
use serde::Serialize;

/// A simple moving average aligned to the close-price series it was computed
/// from. `None` marks positions where fewer than `window` closes exist yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmaSeries {
    window: usize,
    values: Vec<Option<Decimal>>,
}

impl SmaSeries {
    /// A series of `len` positions with no defined value.
    pub fn unavailable(window: usize, len: usize) -> Self {
        Self {
            window,
            values: vec![None; len],
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Option<Decimal>] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<Decimal> {
        self.values.get(index).copied().flatten()
    }

    /// The defined values, oldest first.
    pub fn defined(&self) -> impl DoubleEndedIterator<Item = Decimal> + '_ {
        self.values.iter().filter_map(|v| *v)
    }

    /// Most recent defined value.
    pub fn latest(&self) -> Option<Decimal> {
        self.defined().next_back()
    }

    /// Defined value just before `latest`.
    pub fn previous(&self) -> Option<Decimal> {
        self.defined().rev().nth(1)
    }
}

/// Computes the `window`-period SMA of `closes`.
///
/// Each defined value is the exact sum of its trailing window divided by
/// `window`, so equal windows always give equal averages. Positions
/// `0..window-1` are `None`. If the series is shorter than the window, or the
/// window is zero, every position is `None`.
pub fn compute_sma(closes: &[Decimal], window: usize) -> SmaSeries {
    if window == 0 || closes.len() < window {
        return SmaSeries::unavailable(window, closes.len());
    }

    let divisor = Decimal::from(window);
    let values = (0..closes.len())
        .map(|i| {
            let start = (i + 1).checked_sub(window)?;
            window_mean(&closes[start..=i], divisor)
        })
        .collect();

    SmaSeries { window, values }
}

// `None` only if the window sum leaves the `Decimal` range.
fn window_mean(window: &[Decimal], divisor: Decimal) -> Option<Decimal> {
    window
        .iter()
        .try_fold(Decimal::ZERO, |sum, close| sum.checked_add(*close))?
        .checked_div(divisor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sma_matches_trailing_mean() {
        let closes = vec![dec!(1), dec!(2), dec!(3), dec!(4), dec!(5)];
        let sma = compute_sma(&closes, 3);
        assert_eq!(sma.values(), &[None, None, Some(dec!(2)), Some(dec!(3)), Some(dec!(4))]);
        assert_eq!(sma.window(), 3);
    }

    #[test]
    fn test_sma_shorter_than_window_is_all_unavailable() {
        let closes = vec![dec!(10), dec!(11), dec!(12)];
        let sma = compute_sma(&closes, 5);
        assert_eq!(sma.len(), 3);
        assert!(sma.values().iter().all(Option::is_none));
        assert_eq!(sma.latest(), None);
    }

    #[test]
    fn test_sma_defined_portion_length() {
        let closes: Vec<Decimal> = (1..=40).map(Decimal::from).collect();
        for window in 1..=40 {
            let sma = compute_sma(&closes, window);
            assert_eq!(sma.len(), closes.len());
            assert_eq!(sma.defined().count(), closes.len() - window + 1);
        }
    }

    #[test]
    fn test_zero_window_is_all_unavailable() {
        let sma = compute_sma(&[dec!(1), dec!(2)], 0);
        assert_eq!(sma.values(), &[None, None]);
    }

    #[test]
    fn test_window_of_one_echoes_closes() {
        let sma = compute_sma(&[dec!(7), dec!(3), dec!(9)], 1);
        assert_eq!(sma.values(), &[Some(dec!(7)), Some(dec!(3)), Some(dec!(9))]);
    }

    #[test]
    fn test_latest_and_previous() {
        let sma = compute_sma(&[dec!(2), dec!(4), dec!(6), dec!(8)], 2);
        assert_eq!(sma.latest(), Some(dec!(7)));
        assert_eq!(sma.previous(), Some(dec!(5)));

        let single = compute_sma(&[dec!(2), dec!(4)], 2);
        assert_eq!(single.latest(), Some(dec!(3)));
        assert_eq!(single.previous(), None);
    }

    #[test]
    fn test_empty_input() {
        let sma = compute_sma(&[], 3);
        assert!(sma.is_empty());
    }

    #[test]
    fn test_constant_fractional_closes_give_constant_average() {
        for price in [dec!(10.1), dec!(0.1), dec!(1.7), dec!(123.45), dec!(0.3)] {
            let sma = compute_sma(&[price; 40], 25);
            assert!(sma.defined().all(|v| v == price), "average drifted for {price}");
        }
    }

    #[test]
    fn test_equal_windows_give_equal_averages() {
        // Both trailing windows sum to 1.0.
        let sma = compute_sma(&[dec!(0.1), dec!(0.2), dec!(0.7), dec!(0.1)], 3);
        assert_eq!(sma.latest(), sma.previous());
    }
}
