//! Indicator series computed over a whole price history.
//!
//! Both indicators share one smoothing primitive, the recursive EMA from the
//! `ta` crate: `ema[0] = x[0]`, `ema[t] = x[t] * k + ema[t-1] * (1 - k)` with
//! `k = 2 / (period + 1)`. There is no warm-up gap.

use crate::error::StrategyError;
use rust_decimal::prelude::*;
use ta::indicators::ExponentialMovingAverage as Ema;
use ta::Next;

fn smoother(period: usize) -> Result<Ema, StrategyError> {
    Ema::new(period).map_err(|e| {
        StrategyError::IndicatorError(format!("cannot build EMA with period {period}: {e:?}"))
    })
}

/// Converts close prices to the `f64` domain the indicator library works in.
pub fn to_f64_series(prices: &[Decimal]) -> Result<Vec<f64>, StrategyError> {
    prices
        .iter()
        .map(|p| {
            p.to_f64()
                .ok_or_else(|| StrategyError::IndicatorError(format!("price {p} is not representable as f64")))
        })
        .collect()
}

/// Exponential moving average, defined for every index of `series`.
pub fn compute_ema(series: &[f64], period: usize) -> Result<Vec<f64>, StrategyError> {
    let mut ema = smoother(period)?;
    Ok(series.iter().map(|&price| ema.next(price)).collect())
}

/// Relative strength index with EMA-smoothed average gain and loss.
///
/// Both averages are seeded with a zero move at index 0, so the first real
/// delta is already smoothed against it. Index 0 itself has no prior delta and
/// is always `None`. A window without any loss
/// reads 100; a window without any movement at all has no defined value and is
/// also `None`, which consumers treat as "no signal".
pub fn compute_rsi(series: &[f64], period: usize) -> Result<Vec<Option<f64>>, StrategyError> {
    let mut avg_gain = smoother(period)?;
    let mut avg_loss = smoother(period)?;

    let mut rsi = Vec::with_capacity(series.len());
    if series.is_empty() {
        return Ok(rsi);
    }
    rsi.push(None);
    avg_gain.next(0.0);
    avg_loss.next(0.0);

    for pair in series.windows(2) {
        let delta = pair[1] - pair[0];
        let gain = avg_gain.next(delta.max(0.0));
        let loss = avg_loss.next((-delta).max(0.0));
        rsi.push(rsi_value(gain, loss));
    }
    Ok(rsi)
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        // RS is unbounded: pure gains pin the oscillator at its ceiling.
        return (avg_gain > 0.0).then_some(100.0);
    }
    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
    }

    #[test]
    fn ema_starts_at_first_price_and_smooths_recursively() {
        let ema = compute_ema(&[10.0, 12.0, 11.0], 3).unwrap();
        // k = 0.5
        assert_close(ema[0], 10.0);
        assert_close(ema[1], 11.0);
        assert_close(ema[2], 11.0);
    }

    #[test]
    fn ema_with_period_one_tracks_price() {
        let prices = [3.0, 7.5, 1.25];
        assert_eq!(compute_ema(&prices, 1).unwrap(), prices.to_vec());
    }

    #[test]
    fn zero_period_is_an_indicator_error() {
        assert!(matches!(compute_ema(&[1.0], 0), Err(StrategyError::IndicatorError(_))));
        assert!(matches!(compute_rsi(&[1.0], 0), Err(StrategyError::IndicatorError(_))));
    }

    #[test]
    fn rsi_first_value_is_undefined() {
        let rsi = compute_rsi(&[10.0, 11.0, 10.0], 3).unwrap();
        assert_eq!(rsi.len(), 3);
        assert!(rsi[0].is_none());
        assert_close(rsi[1].unwrap(), 100.0);
        // gain 0 -> 0.5 -> 0.25, loss 0 -> 0 -> 0.5
        assert_close(rsi[2].unwrap(), 100.0 / 3.0);
    }

    #[test]
    fn rsi_of_rising_series_is_pinned_at_100() {
        let prices: Vec<f64> = (1..=20).map(f64::from).collect();
        let rsi = compute_rsi(&prices, 14).unwrap();
        assert!(rsi[1..].iter().all(|v| *v == Some(100.0)));
    }

    #[test]
    fn rsi_of_flat_series_has_no_value() {
        let rsi = compute_rsi(&[5.0; 6], 3).unwrap();
        assert!(rsi.iter().all(Option::is_none));
    }

    #[test]
    fn rsi_stays_within_bounds() {
        let prices = [100.0, 101.0, 102.0, 95.0, 90.0, 95.0, 100.0, 105.0];
        let rsi = compute_rsi(&prices, 3).unwrap();
        assert!(rsi.iter().flatten().all(|v| (0.0..=100.0).contains(v)));
    }

    #[test]
    fn rsi_averages_start_from_a_zero_move() {
        let rsi = compute_rsi(&[100.0, 101.0, 102.0, 95.0], 3).unwrap();
        // avg gain 0 -> 0.5 -> 0.75 -> 0.375, avg loss 0 -> 0 -> 0 -> 3.5
        assert_close(rsi[3].unwrap(), 100.0 - 100.0 / (1.0 + 0.375 / 3.5));
        assert!((rsi[3].unwrap() - 9.6774).abs() < 1e-4);
    }

    #[test]
    fn empty_series_yields_empty_indicators() {
        assert!(compute_ema(&[], 5).unwrap().is_empty());
        assert!(compute_rsi(&[], 5).unwrap().is_empty());
    }
}
