//! Rate resolution and amount formatting

use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::shared::errors::CommandError;

use super::types::{CurrencyResult, RateTable};
use super::PIVOT_CURRENCY;

/// Fractional digits in every formatted currency result
pub const CURRENCY_PRECISION: u32 = 2;

/// Offline USD-based rates used when the remote source is unavailable
const FALLBACK_USD_RATES: &[(&str, i64, u32)] = &[
    ("EUR", 92, 2),
    ("GBP", 79, 2),
    ("JPY", 14950, 2),
    ("CHF", 88, 2),
    ("AUD", 152, 2),
    ("CAD", 136, 2),
    ("CNY", 724, 2),
    ("HKD", 782, 2),
    ("SGD", 134, 2),
    ("INR", 8310, 2),
];

pub fn fallback_table() -> RateTable {
    let usd: HashMap<String, Decimal> = FALLBACK_USD_RATES
        .iter()
        .map(|(code, mantissa, scale)| (code.to_string(), Decimal::new(*mantissa, *scale)))
        .collect();

    let mut table = RateTable::new();
    table.insert(PIVOT_CURRENCY.to_string(), usd);
    table
}

fn lookup(rates: &RateTable, base: &str, target: &str) -> Option<Decimal> {
    rates
        .get(base)
        .and_then(|targets| targets.get(target))
        .copied()
        .filter(|rate| !rate.is_zero())
}

/// Rate of `code` against the pivot, where the pivot itself is 1
fn pivot_rate(rates: &RateTable, code: &str) -> Option<Decimal> {
    if code == PIVOT_CURRENCY {
        return Some(Decimal::ONE);
    }
    lookup(rates, PIVOT_CURRENCY, code)
}

/// Resolve the `from -> to` rate: direct, then reciprocal, then through USD.
///
/// Codes must already be normalized (trimmed, upper case).
pub fn resolve_rate(rates: &RateTable, from: &str, to: &str) -> Option<Decimal> {
    if from == to {
        return Some(Decimal::ONE);
    }

    if let Some(direct) = lookup(rates, from, to) {
        return Some(direct);
    }

    if let Some(inverse) = lookup(rates, to, from) {
        if let Some(rate) = Decimal::ONE.checked_div(inverse) {
            return Some(rate);
        }
    }

    let from_pivot = pivot_rate(rates, from)?;
    let to_pivot = pivot_rate(rates, to)?;
    to_pivot.checked_div(from_pivot)
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Convert a decimal amount, returning the raw (unrounded) result and the rate used
pub fn convert_amount(amount: Decimal, from: &str, to: &str, rates: &RateTable) -> CurrencyResult<(Decimal, Decimal)> {
    let from = normalize_code(from);
    let to = normalize_code(to);

    // Same code needs no table entry and no catalogue check
    if from == to && !from.is_empty() {
        return Ok((amount, Decimal::ONE));
    }

    for code in [&from, &to] {
        if !super::is_valid_code(code) {
            return Err(CommandError::InvalidInput(format!("Currency not supported: {}", code)));
        }
    }

    let rate = resolve_rate(rates, &from, &to).ok_or_else(|| CommandError::UnresolvedConversion {
        from: from.clone(),
        to: to.clone(),
    })?;

    let result = amount
        .checked_mul(rate)
        .ok_or_else(|| CommandError::InvalidInput("Amount too large to convert".into()))?;

    tracing::debug!("[convert_amount] {} {} -> {} {} (rate={})", amount, from, result, to, rate);

    Ok((result, rate))
}

/// Convert and format to two decimals
pub fn convert(amount: f64, from: &str, to: &str, rates: &RateTable) -> CurrencyResult<String> {
    let amount = amount_from_f64(amount)?;
    let (result, _) = convert_amount(amount, from, to, rates)?;
    Ok(format_amount(result))
}

/// Same as [`convert`] but starting from the raw text of the amount field
pub fn convert_text(text: &str, from: &str, to: &str, rates: &RateTable) -> CurrencyResult<String> {
    let amount = crate::core::features::parse_finite(text)?;
    convert(amount, from, to, rates)
}

pub fn amount_from_f64(amount: f64) -> CurrencyResult<Decimal> {
    if !amount.is_finite() {
        return Err(CommandError::NonFiniteInput(amount.to_string()));
    }
    Decimal::try_from(amount)
        .map_err(|e| CommandError::InvalidInput(format!("Amount out of range: {}", e)))
}

/// Half away from zero, always two fractional digits ("8.50", "-0.10")
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(CURRENCY_PRECISION, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_PRECISION);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.to_string()
}
