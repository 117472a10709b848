//! Descriptive statistics over decimal samples.

use crate::error::CoreError;
use rust_decimal::prelude::*;

/// Arithmetic mean, or `None` for an empty sample.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum: Decimal = values.iter().sum();
    Some(sum / Decimal::from(values.len()))
}

/// Population standard deviation (divides by `n`). Zero for an empty sample.
pub fn population_std_dev(values: &[Decimal]) -> Result<Decimal, CoreError> {
    let Some(mean) = mean(values) else {
        return Ok(Decimal::ZERO);
    };
    let variance = values
        .iter()
        .map(|v| (*v - mean) * (*v - mean))
        .sum::<Decimal>()
        / Decimal::from(values.len());

    variance
        .sqrt()
        .ok_or_else(|| CoreError::Calculation(format!("cannot take square root of variance {variance}")))
}

/// The `q`-th quantile (`0 <= q <= 1`) using linear interpolation between
/// closest ranks. `None` for an empty sample.
pub fn quantile(values: &[Decimal], q: Decimal) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort();

    let rank = q.clamp(Decimal::ZERO, Decimal::ONE) * Decimal::from(sorted.len() - 1);
    let lower = rank.floor();
    let lo = lower.to_usize()?;
    let hi = rank.ceil().to_usize()?;
    let fraction = rank - lower;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * fraction)
}
