use backtester::{BacktestError, Backtester};
use chrono::{Duration, TimeZone, Utc};
use configuration::{EmaCrossoverParams, RsiMeanReversionParams, StrategyParams};
use core_types::{Candle, RiskLevel, StrategyId, Trade};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use strategies::StrategyError;

/// A deterministic oscillating series: a slow sine wave riding a gentle drift.
fn wave(n: usize) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let t = i as f64;
            let price = 100.0 + 0.05 * t + 8.0 * (t * 0.2).sin() + 3.0 * (t * 0.7).sin();
            let close = Decimal::from_f64(price).unwrap().round_dp(2);
            Candle::from_close(start + Duration::hours(i as i64), close)
        })
        .collect()
}

fn ema(short: usize, long: usize) -> StrategyParams {
    EmaCrossoverParams {
        short_period: short,
        long_period: long,
    }
    .into()
}

fn assert_single_position(trades: &[Trade]) {
    for trade in trades {
        assert!(trade.entry_index < trade.exit_index, "{trade:?}");
    }
    for pair in trades.windows(2) {
        assert!(pair[0].exit_index < pair[1].entry_index, "{pair:?}");
    }
}

#[test]
fn ema_crossover_pipeline_produces_consistent_reports() {
    let outcome = Backtester::new().run(&wave(300), &ema(3, 8), dec!(1000)).unwrap();

    assert_eq!(outcome.strategy, StrategyId::EmaCrossover);
    assert_eq!(outcome.label, "ema_3_8");
    assert!(!outcome.trades.is_empty());
    assert_single_position(&outcome.trades);

    let metrics = &outcome.metrics;
    assert_eq!(metrics.total_trades, outcome.trades.len());
    assert!(metrics.win_rate >= Decimal::ZERO && metrics.win_rate <= Decimal::ONE);
    assert!(metrics.max_drawdown >= Decimal::ZERO && metrics.max_drawdown <= Decimal::ONE);

    let risk = &outcome.risk;
    assert!(risk.return_volatility >= Decimal::ZERO);
    assert!(risk.largest_loss <= Decimal::ZERO);
    assert!(risk.avg_loss <= Decimal::ZERO);
    assert!(risk.largest_loss <= risk.avg_loss);
}

#[test]
fn rsi_pipeline_keeps_single_position_discipline() {
    let params = StrategyParams::RsiMeanReversion(RsiMeanReversionParams {
        period: 5,
        oversold: dec!(35),
        overbought: dec!(65),
    });
    let outcome = Backtester::new().run(&wave(300), &params, dec!(1000)).unwrap();

    assert_eq!(outcome.strategy, StrategyId::RsiMeanReversion);
    assert_single_position(&outcome.trades);
    assert!(outcome.trades.iter().all(|t| t.exit_reason.is_some()));
}

#[test]
fn identical_inputs_give_identical_outcomes() {
    let candles = wave(250);
    let backtester = Backtester::new();
    for params in [ema(5, 13), RsiMeanReversionParams::default().into()] {
        let first = backtester.run(&candles, &params, dec!(1000)).unwrap();
        let second = backtester.run(&candles, &params, dec!(1000)).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn run_without_trades_reports_zeroes_and_low_risk() {
    let candles: Vec<Candle> = wave(30)
        .into_iter()
        .enumerate()
        .map(|(i, mut c)| {
            c.close = Some(Decimal::from(100 + i as i64));
            c
        })
        .collect();
    let outcome = Backtester::new().run(&candles, &ema(3, 5), dec!(1000)).unwrap();

    assert!(outcome.trades.is_empty());
    assert_eq!(outcome.metrics.total_trades, 0);
    assert_eq!(outcome.metrics.total_return, Decimal::ZERO);
    assert_eq!(outcome.risk.risk_level, RiskLevel::Low);
}

#[test]
fn strategy_errors_propagate_from_run() {
    let err = Backtester::new().run(&wave(10), &ema(9, 21), dec!(1000)).unwrap_err();
    assert!(matches!(
        err,
        BacktestError::Strategy(StrategyError::InsufficientData { required: 21, actual: 10 })
    ));

    let err = Backtester::new().run(&wave(50), &ema(9, 21), Decimal::ZERO).unwrap_err();
    assert!(matches!(err, BacktestError::Analytics(_)));
}

#[test]
fn compare_ranks_valid_candidates_and_skips_invalid_ones() {
    let candidates = vec![
        ema(3, 8),
        ema(21, 9), // rejected: short must be below long
        ema(5, 13),
        RsiMeanReversionParams::default().into(),
    ];
    let ranked = Backtester::new().compare(&wave(300), &candidates, dec!(1000)).unwrap();

    assert_eq!(ranked.entries.len(), 3);
    assert_eq!(ranked.best_strategy, ranked.entries[0].label);
    for pair in ranked.entries.windows(2) {
        assert!(pair[0].report.total_return >= pair[1].report.total_return);
    }
    assert!(ranked.entries.iter().all(|e| e.label != "ema_21_9"));
}

#[test]
fn compare_without_any_valid_candidate_fails() {
    let err = Backtester::new()
        .compare(&wave(300), &[ema(8, 3)], dec!(1000))
        .unwrap_err();
    assert!(matches!(err, BacktestError::Analyzer(_)));
}
