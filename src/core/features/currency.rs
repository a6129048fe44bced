//! Currency converter feature
//!
//! Rates come from a remote provider when it answers and from a static
//! USD-based table otherwise; conversion is the same over either.

pub mod rates;
pub mod service;
pub mod types;

use crate::shared::types::CurrencyDTO;

pub use rates::{convert, convert_text, fallback_table, format_amount, resolve_rate};
pub use service::{CurrencyService, HttpRateProvider, RateProvider};
pub use types::{ConvertCurrencyRequest, ConvertCurrencyResponse, RateSource, RateTable};

/// Triangulation pivot
pub const PIVOT_CURRENCY: &str = "USD";

const CURRENCIES: &[(&str, &str)] = &[
    ("USD", "US Dollar"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("JPY", "Japanese Yen"),
    ("CHF", "Swiss Franc"),
    ("AUD", "Australian Dollar"),
    ("CAD", "Canadian Dollar"),
    ("CNY", "Chinese Yuan"),
    ("HKD", "Hong Kong Dollar"),
    ("SGD", "Singapore Dollar"),
    ("INR", "Indian Rupee"),
];

/// Currencies offered in the pickers, in display order
pub fn supported_currencies() -> Vec<CurrencyDTO> {
    CURRENCIES
        .iter()
        .map(|(code, name)| CurrencyDTO {
            code: code.to_string(),
            name: name.to_string(),
        })
        .collect()
}

pub fn currency_name(code: &str) -> Option<&'static str> {
    let code = rates::normalize_code(code);
    CURRENCIES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

#[inline]
pub fn is_valid_code(code: &str) -> bool {
    let code = code.trim();
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue() {
        let all = supported_currencies();
        assert_eq!(all.len(), 11);
        assert_eq!(all[0].code, "USD");
        assert_eq!(currency_name("gbp"), Some("British Pound"));
        assert_eq!(currency_name("XXX"), None);
    }

    #[test]
    fn test_is_valid_code() {
        assert!(is_valid_code("usd"));
        assert!(!is_valid_code("US"));
        assert!(!is_valid_code("U5D"));
    }
}
