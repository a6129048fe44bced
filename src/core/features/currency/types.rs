use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use ts_rs::TS;

use crate::shared::errors::CommandError;

/// base code -> target code -> rate
pub type RateTable = HashMap<String, HashMap<String, Decimal>>;

pub type CurrencyResult<T> = Result<T, CommandError>;

/// Where the active rate table came from
#[derive(Debug, Clone, PartialEq)]
pub enum RateSource {
    Live(RateTable),
    Fallback(RateTable),
}

impl RateSource {
    pub fn table(&self) -> &RateTable {
        match self {
            RateSource::Live(table) | RateSource::Fallback(table) => table,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, RateSource::Live(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            RateSource::Live(_) => "live",
            RateSource::Fallback(_) => "fallback",
        }
    }
}

/// Request payload for currency conversion.
///
/// Amount accepts either a JSON number or string to avoid JS float precision loss;
/// it is parsed into `Decimal` for all calculations.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "widgets.ts")]
pub struct ConvertCurrencyRequest {
    #[serde(serialize_with = "serialize_decimal", deserialize_with = "deserialize_decimal")]
    #[ts(type = "string | number")]
    pub amount: Decimal,
    pub from: String,
    pub to: String,
}

/// Response payload for currency conversion.
///
/// Decimal fields are serialized as strings to protect precision across the boundary.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "widgets.ts")]
pub struct ConvertCurrencyResponse {
    /// Converted amount, two decimals
    pub result: String,
    #[serde(serialize_with = "serialize_decimal", deserialize_with = "deserialize_decimal")]
    #[ts(type = "string")]
    pub rate: Decimal,
    /// "live" or "fallback"
    pub source: String,
    pub timestamp: Option<String>,
}

/// Network payload from the open.er-api endpoint.
#[derive(Debug, Deserialize)]
pub struct RatesApiResponse {
    pub result: String,
    pub time_last_update_unix: Option<i64>,
    #[serde(default = "default_base_code")]
    pub base_code: String,
    #[serde(deserialize_with = "deserialize_rates")]
    pub rates: HashMap<String, Decimal>,
}

fn default_base_code() -> String {
    super::PIVOT_CURRENCY.to_string()
}

// ---- Serde helpers ----

fn serialize_decimal<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrString {
        Num(f64),
        Str(String),
    }

    match NumOrString::deserialize(deserializer)? {
        NumOrString::Num(n) => Decimal::try_from(n).map_err(serde::de::Error::custom),
        NumOrString::Str(s) => Decimal::from_str_exact(s.trim()).map_err(serde::de::Error::custom),
    }
}

/// JSON numbers keep their written digits ("0.85" stays 0.85)
fn number_to_decimal(num: &serde_json::Number) -> Option<Decimal> {
    let text = num.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn deserialize_rates<'de, D>(deserializer: D) -> Result<HashMap<String, Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<String, Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(code, value)| {
            let dec = match value {
                Value::Number(num) => number_to_decimal(&num)
                    .ok_or_else(|| serde::de::Error::custom("invalid numeric rate"))?,
                Value::String(s) => Decimal::from_str_exact(&s)
                    .map_err(|e| serde::de::Error::custom(format!("invalid rate string: {}", e)))?,
                _ => return Err(serde::de::Error::custom("unsupported rate type")),
            };
            Ok((code.to_uppercase(), dec))
        })
        .collect()
}
