use crate::error::RegimeError;
use crate::report::RegimeReport;
use core_types::stats::{mean, population_std_dev};
use core_types::{closes, Candle, MarketRegime, VolatilityLevel};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

const REPORT_DP: u32 = 4;

/// Candles per year at hourly cadence. Volatility is always annualized with this
/// factor, whatever interval the candles actually have.
const PERIODS_PER_YEAR: u32 = 24 * 365;

/// Annualized volatility above which the market is volatile regardless of trend.
const VOLATILE_ABOVE: Decimal = dec!(1.5);
const TRENDING_ABOVE: Decimal = dec!(0.6);
const LOW_VOLATILITY_BELOW: Decimal = dec!(0.5);

const MIN_CANDLES: usize = 2;

/// A stateless classifier of market regime.
#[derive(Debug, Default, Clone)]
pub struct RegimeAnalyzer {}

impl RegimeAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analyze(&self, candles: &[Candle]) -> Result<RegimeReport, RegimeError> {
        if candles.len() < MIN_CANDLES {
            return Err(RegimeError::InsufficientData {
                required: MIN_CANDLES,
                actual: candles.len(),
            });
        }
        let prices = closes(candles)?;

        let trend_strength = trend_strength(&prices)?;
        let volatility = annualized_volatility(&prices)?;
        let (first, last) = (prices[0], prices[prices.len() - 1]);
        let price_change_pct = relative_change(first, last)?;

        let report = RegimeReport {
            regime: classify_regime(trend_strength, volatility),
            trend_strength: trend_strength.round_dp(REPORT_DP),
            volatility_level: classify_volatility(volatility),
            volatility_value: volatility.round_dp(REPORT_DP),
            price_change_pct: price_change_pct.round_dp(REPORT_DP),
        };
        tracing::info!(
            regime = %report.regime,
            trend_strength = %report.trend_strength,
            volatility = %report.volatility_value,
            "Market regime classified"
        );
        Ok(report)
    }
}

/// Volatility takes priority over trend.
pub fn classify_regime(trend_strength: Decimal, volatility: Decimal) -> MarketRegime {
    if volatility > VOLATILE_ABOVE {
        MarketRegime::Volatile
    } else if trend_strength > TRENDING_ABOVE {
        MarketRegime::Trending
    } else {
        MarketRegime::Ranging
    }
}

pub fn classify_volatility(volatility: Decimal) -> VolatilityLevel {
    if volatility < LOW_VOLATILITY_BELOW {
        VolatilityLevel::Low
    } else if volatility < VOLATILE_ABOVE {
        VolatilityLevel::Medium
    } else {
        VolatilityLevel::High
    }
}

fn relative_change(from: Decimal, to: Decimal) -> Result<Decimal, RegimeError> {
    (to - from)
        .checked_div(from)
        .ok_or_else(|| RegimeError::Regression(format!("cannot compute change relative to {from}")))
}

/// |R²| of an ordinary least squares fit of price against the time index.
///
/// R² is scale-free, so the fit runs on prices relative to the first close to
/// keep the sums of squares inside `Decimal` range. A constant series has no
/// variance to explain and reports zero.
fn trend_strength(prices: &[Decimal]) -> Result<Decimal, RegimeError> {
    let base = prices[0];
    let ys = prices
        .iter()
        .map(|&p| p.checked_div(base).ok_or_else(|| overflow("normalizing prices")))
        .collect::<Result<Vec<_>, _>>()?;

    let y_mean = mean(&ys).unwrap_or(Decimal::ZERO);
    let x_mean = Decimal::from(ys.len() - 1) / Decimal::TWO;

    let mut sxx = Decimal::ZERO;
    let mut sxy = Decimal::ZERO;
    let mut ss_tot = Decimal::ZERO;
    for (i, &y) in ys.iter().enumerate() {
        let dx = Decimal::from(i) - x_mean;
        let dy = y - y_mean;
        sxx = accumulate(sxx, dx, dx)?;
        sxy = accumulate(sxy, dx, dy)?;
        ss_tot = accumulate(ss_tot, dy, dy)?;
    }

    if ss_tot.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let slope = sxy
        .checked_div(sxx)
        .ok_or_else(|| RegimeError::Regression("time index has no variance".to_string()))?;
    let intercept = slope
        .checked_mul(x_mean)
        .and_then(|v| y_mean.checked_sub(v))
        .ok_or_else(|| overflow("fitting intercept"))?;

    let mut ss_res = Decimal::ZERO;
    for (i, &y) in ys.iter().enumerate() {
        let fitted = slope
            .checked_mul(Decimal::from(i))
            .and_then(|v| v.checked_add(intercept))
            .ok_or_else(|| overflow("fitting trend line"))?;
        let residual = y - fitted;
        ss_res = accumulate(ss_res, residual, residual)?;
    }

    let unexplained = ss_res.checked_div(ss_tot).ok_or_else(|| overflow("computing R²"))?;
    Ok((Decimal::ONE - unexplained).abs())
}

/// `sum + a * b`, failing instead of panicking when `Decimal` overflows.
fn accumulate(sum: Decimal, a: Decimal, b: Decimal) -> Result<Decimal, RegimeError> {
    a.checked_mul(b)
        .and_then(|product| sum.checked_add(product))
        .ok_or_else(|| overflow("accumulating sums of squares"))
}

fn overflow(step: &str) -> RegimeError {
    RegimeError::Regression(format!("numeric overflow while {step}"))
}

/// Standard deviation of simple period returns, scaled to a yearly horizon.
fn annualized_volatility(prices: &[Decimal]) -> Result<Decimal, RegimeError> {
    let returns = prices
        .windows(2)
        .map(|pair| relative_change(pair[0], pair[1]))
        .collect::<Result<Vec<_>, _>>()?;

    if returns.len() < 2 {
        return Ok(Decimal::ZERO);
    }

    let factor = Decimal::from(PERIODS_PER_YEAR)
        .sqrt()
        .ok_or_else(|| RegimeError::Regression("cannot compute annualization factor".to_string()))?;
    Ok(population_std_dev(&returns)? * factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn candles(prices: &[Decimal]) -> Vec<Candle> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| Candle::from_close(start + Duration::hours(i as i64), p))
            .collect()
    }

    fn analyze(prices: &[Decimal]) -> RegimeReport {
        RegimeAnalyzer::new().analyze(&candles(prices)).unwrap()
    }

    #[test]
    fn steady_climb_is_trending() {
        let prices: Vec<Decimal> = (100..200).map(Decimal::from).collect();
        let report = analyze(&prices);

        assert_eq!(report.regime, MarketRegime::Trending);
        assert_eq!(report.trend_strength, Decimal::ONE);
        assert_eq!(report.volatility_level, VolatilityLevel::Low);
        assert!(report.volatility_value > dec!(0.13) && report.volatility_value < dec!(0.14));
        assert_eq!(report.price_change_pct, dec!(0.99));
    }

    #[test]
    fn constant_series_is_ranging_without_trend() {
        let report = analyze(&[dec!(42); 10]);
        assert_eq!(report.regime, MarketRegime::Ranging);
        assert_eq!(report.trend_strength, Decimal::ZERO);
        assert_eq!(report.volatility_value, Decimal::ZERO);
        assert_eq!(report.volatility_level, VolatilityLevel::Low);
        assert_eq!(report.price_change_pct, Decimal::ZERO);
    }

    #[test]
    fn small_oscillation_is_ranging() {
        let prices: Vec<Decimal> = (0..50).map(|t| if t % 2 == 0 { dec!(100) } else { dec!(100.2) }).collect();
        let report = analyze(&prices);
        assert_eq!(report.regime, MarketRegime::Ranging);
        assert_eq!(report.volatility_level, VolatilityLevel::Low);
        assert!(report.trend_strength < dec!(0.01));
    }

    #[test]
    fn volatility_overrides_a_strong_trend() {
        // Rising 5 per candle while swinging +/-4% around the trend.
        let prices: Vec<Decimal> = (0..60i64)
            .map(|t| {
                let swing = if t % 2 == 0 { dec!(1.04) } else { dec!(0.96) };
                Decimal::from(100 + 5 * t) * swing
            })
            .collect();
        let report = analyze(&prices);

        assert!(report.trend_strength > dec!(0.6));
        assert!(report.volatility_value > dec!(1.5));
        assert_eq!(report.regime, MarketRegime::Volatile);
        assert_eq!(report.volatility_level, VolatilityLevel::High);
    }

    #[test]
    fn classification_thresholds() {
        assert_eq!(classify_regime(dec!(0.9), dec!(1.5)), MarketRegime::Trending);
        assert_eq!(classify_regime(dec!(0.6), dec!(0.2)), MarketRegime::Ranging);
        assert_eq!(classify_regime(dec!(0.1), dec!(1.51)), MarketRegime::Volatile);

        assert_eq!(classify_volatility(dec!(0.49)), VolatilityLevel::Low);
        assert_eq!(classify_volatility(dec!(0.5)), VolatilityLevel::Medium);
        assert_eq!(classify_volatility(dec!(1.49)), VolatilityLevel::Medium);
        assert_eq!(classify_volatility(dec!(1.5)), VolatilityLevel::High);
    }

    #[test]
    fn very_large_prices_fit_without_overflow() {
        let prices: Vec<Decimal> = (1..=10i64).map(|i| Decimal::from(i * 1_000_000_000_000_000)).collect();
        let report = analyze(&prices);
        assert_eq!(report.trend_strength, Decimal::ONE);
        assert_eq!(report.regime, MarketRegime::Volatile);
        assert_eq!(report.price_change_pct, dec!(9));
    }

    #[test]
    fn needs_two_candles() {
        let err = RegimeAnalyzer::new().analyze(&candles(&[dec!(10)])).unwrap_err();
        assert!(matches!(err, RegimeError::InsufficientData { required: 2, actual: 1 }));
    }

    #[test]
    fn two_candles_have_no_volatility() {
        let report = analyze(&[dec!(10), dec!(12)]);
        assert_eq!(report.volatility_value, Decimal::ZERO);
        assert_eq!(report.trend_strength, Decimal::ONE);
        assert_eq!(report.price_change_pct, dec!(0.2));
    }

    #[test]
    fn missing_close_is_reported() {
        let mut candles = candles(&[dec!(10), dec!(11), dec!(12)]);
        candles[2].close = None;
        assert!(matches!(
            RegimeAnalyzer::new().analyze(&candles),
            Err(RegimeError::Core(core_types::CoreError::MissingField { index: 2, .. }))
        ));
    }

    #[test]
    fn repeated_analysis_is_identical() {
        let prices: Vec<Decimal> = (1..40).map(|t| Decimal::from(t * t % 17 + 50)).collect();
        assert_eq!(analyze(&prices), analyze(&prices));
    }
}
