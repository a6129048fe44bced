//! Widget features
//!
//! Each feature is a plain value owned by its widget; none of them touch the
//! UI directly. User-facing messages go through a [`crate::shared::Notifier`].

pub mod calculator;
pub mod currency;
pub mod unit_converter;

use crate::shared::errors::{CommandError, CommandResult};

/// Parse a numeric input field, rejecting empty, non-numeric, NaN and infinite text
pub fn parse_finite(text: &str) -> CommandResult<f64> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CommandError::NonFiniteInput(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_finite() {
        assert_eq!(parse_finite(" 12.5 ").unwrap(), 12.5);
        assert_eq!(parse_finite("-3").unwrap(), -3.0);
        for bad in ["", "abc", "NaN", "inf", "-infinity", "1e400"] {
            assert!(
                matches!(parse_finite(bad), Err(CommandError::NonFiniteInput(_))),
                "expected rejection of {:?}",
                bad
            );
        }
    }
}
