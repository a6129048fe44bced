//! Unit converter feature
//!
//! Length and weight are table driven: every unit stores how many of it make
//! up one base unit (meters, kilograms). Temperature pivots through Celsius
//! with affine formulas. All results use the same fixed precision.

use super::parse_finite;
use crate::shared::errors::{CommandError, CommandResult};
use crate::shared::settings::UserPreferences;
use crate::shared::types::{ConvertUnitsRequest, ConvertUnitsResponse, ParseUnitResponse, UnitCategory, UnitDTO};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Fractional digits in every formatted unit result
pub const UNIT_PRECISION: usize = 6;

const ERR_CANNOT_PARSE_UNIT: &str = "Could not parse unit from text";

// ============================================================================
// Unit Registry
// ============================================================================

/// How a unit relates to its category's base
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// Number of this unit in one base unit
    PerBase(f64),
    /// Affine temperature scale, converted through Celsius
    Temperature(TemperatureScale),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureScale {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureScale {
    fn to_celsius(self, value: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => value,
            TemperatureScale::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            TemperatureScale::Kelvin => value - 273.15,
        }
    }

    fn celsius_into(self, celsius: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => celsius,
            TemperatureScale::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            TemperatureScale::Kelvin => celsius + 273.15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UnitDefinition {
    pub code: &'static str,
    pub name: &'static str,
    pub category: UnitCategory,
    pub scale: Scale,
}

fn unit(code: &'static str, name: &'static str, category: UnitCategory, scale: Scale) -> UnitDefinition {
    UnitDefinition { code, name, category, scale }
}

/// Units in display order, per category
static UNIT_TABLE: Lazy<Vec<UnitDefinition>> = Lazy::new(|| {
    use Scale::{PerBase, Temperature};
    use UnitCategory::{Length, Weight};

    vec![
        // Length (base: meters)
        unit("m", "Meters", Length, PerBase(1.0)),
        unit("km", "Kilometers", Length, PerBase(0.001)),
        unit("cm", "Centimeters", Length, PerBase(100.0)),
        unit("mm", "Millimeters", Length, PerBase(1000.0)),
        unit("in", "Inches", Length, PerBase(39.3701)),
        unit("ft", "Feet", Length, PerBase(3.28084)),
        unit("yd", "Yards", Length, PerBase(1.09361)),
        unit("mi", "Miles", Length, PerBase(0.000621371)),
        // Weight (base: kilograms)
        unit("kg", "Kilograms", Weight, PerBase(1.0)),
        unit("g", "Grams", Weight, PerBase(1000.0)),
        unit("mg", "Milligrams", Weight, PerBase(1_000_000.0)),
        unit("lb", "Pounds", Weight, PerBase(2.20462)),
        unit("oz", "Ounces", Weight, PerBase(35.274)),
        // Temperature (pivot: Celsius)
        unit("c", "Celsius", UnitCategory::Temperature, Temperature(TemperatureScale::Celsius)),
        unit("f", "Fahrenheit", UnitCategory::Temperature, Temperature(TemperatureScale::Fahrenheit)),
        unit("k", "Kelvin", UnitCategory::Temperature, Temperature(TemperatureScale::Kelvin)),
    ]
});

/// Category -> unit code -> definition
static UNIT_REGISTRY: Lazy<HashMap<UnitCategory, HashMap<&'static str, &'static UnitDefinition>>> = Lazy::new(|| {
    let mut registry: HashMap<UnitCategory, HashMap<&'static str, &'static UnitDefinition>> = HashMap::new();
    for def in UNIT_TABLE.iter() {
        registry.entry(def.category).or_default().insert(def.code, def);
    }
    registry
});

/// Look up a unit code inside a category (codes are case-insensitive)
pub fn lookup_unit(category: UnitCategory, code: &str) -> CommandResult<&'static UnitDefinition> {
    let code = code.trim().to_ascii_lowercase();
    UNIT_REGISTRY
        .get(&category)
        .and_then(|units| units.get(code.as_str()))
        .copied()
        .ok_or_else(|| CommandError::UnknownUnit(format!("{} is not a {} unit", code, category.as_str())))
}

/// Units of a category in display order
pub fn units_for_category(category: UnitCategory) -> Vec<UnitDTO> {
    UNIT_TABLE
        .iter()
        .filter(|def| def.category == category)
        .map(|def| UnitDTO {
            id: def.code.to_string(),
            label: def.name.to_string(),
            category: def.category,
        })
        .collect()
}

/// Initial (from, to) pair shown when a category tab is opened
pub fn default_units(category: UnitCategory) -> (&'static str, &'static str) {
    match category {
        UnitCategory::Length => ("m", "km"),
        UnitCategory::Weight => ("kg", "g"),
        UnitCategory::Temperature => ("c", "f"),
    }
}

/// Category tab and unit pair the widget opens with
pub fn initial_selection(preferences: &UserPreferences) -> (UnitCategory, &'static str, &'static str) {
    let category = preferences.default_unit_category;
    let (from, to) = default_units(category);
    (category, from, to)
}

// ============================================================================
// Conversion
// ============================================================================

/// Convert a value between two units of the same category
///
/// No physical range check is applied: -10 K converts like any other number.
pub fn convert_value(value: f64, from_unit: &str, to_unit: &str, category: UnitCategory) -> CommandResult<f64> {
    if !value.is_finite() {
        return Err(CommandError::NonFiniteInput(value.to_string()));
    }

    let from = lookup_unit(category, from_unit)?;
    let to = lookup_unit(category, to_unit)?;

    let result = match (from.scale, to.scale) {
        (Scale::PerBase(from_factor), Scale::PerBase(to_factor)) => {
            let base_value = value / from_factor;
            base_value * to_factor
        }
        (Scale::Temperature(from_scale), Scale::Temperature(to_scale)) => {
            if from_scale == to_scale {
                value
            } else {
                to_scale.celsius_into(from_scale.to_celsius(value))
            }
        }
        // Registry keeps each category on a single scale kind
        _ => {
            return Err(CommandError::UnknownUnit(format!(
                "cannot convert {} to {}",
                from.code, to.code
            )))
        }
    };

    if !result.is_finite() {
        return Err(CommandError::InvalidInput("Result is out of range".to_string()));
    }

    tracing::debug!(
        value,
        from = from.code,
        to = to.code,
        result,
        "[convert_value] {}",
        category.as_str()
    );

    Ok(result)
}

/// Convert and format to [`UNIT_PRECISION`] fractional digits
pub fn convert(value: f64, from_unit: &str, to_unit: &str, category: UnitCategory) -> CommandResult<String> {
    let result = convert_value(value, from_unit, to_unit, category)?;
    Ok(format_unit_value(result))
}

/// Same as [`convert`] but starting from the raw text of the input field
pub fn convert_text(text: &str, from_unit: &str, to_unit: &str, category: UnitCategory) -> CommandResult<String> {
    let value = parse_finite(text)?;
    convert(value, from_unit, to_unit, category)
}

pub fn convert_units(request: &ConvertUnitsRequest) -> CommandResult<ConvertUnitsResponse> {
    let result = convert_value(request.value, &request.from_unit, &request.to_unit, request.category)?;

    Ok(ConvertUnitsResponse {
        result,
        formatted_result: format_unit_value(result),
        from_unit: request.from_unit.clone(),
        to_unit: request.to_unit.clone(),
    })
}

pub fn format_unit_value(value: f64) -> String {
    let formatted = format!("{:.*}", UNIT_PRECISION, value);
    // "-0.000000" reads as a sign error in the output field
    if formatted.starts_with('-') && formatted[1..].chars().all(|c| c == '0' || c == '.') {
        formatted[1..].to_string()
    } else {
        formatted
    }
}

// ============================================================================
// Free-text parsing
// ============================================================================

// Unit aliases mapping
fn normalize_unit(unit: &str) -> Option<(&'static str, UnitCategory)> {
    use UnitCategory::{Length, Temperature, Weight};

    let unit_lower = unit.trim().to_lowercase();
    match unit_lower.as_str() {
        // Length
        "mm" | "millimeter" | "millimeters" | "millimetre" | "millimetres" => Some(("mm", Length)),
        "cm" | "centimeter" | "centimeters" | "centimetre" | "centimetres" => Some(("cm", Length)),
        "m" | "meter" | "meters" | "metre" | "metres" => Some(("m", Length)),
        "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => Some(("km", Length)),
        "in" | "inch" | "inches" | "\"" => Some(("in", Length)),
        "ft" | "foot" | "feet" | "'" => Some(("ft", Length)),
        "yd" | "yard" | "yards" => Some(("yd", Length)),
        "mi" | "mile" | "miles" => Some(("mi", Length)),
        // Weight
        "mg" | "milligram" | "milligrams" => Some(("mg", Weight)),
        "g" | "gram" | "grams" => Some(("g", Weight)),
        "kg" | "kilogram" | "kilograms" | "kilo" | "kilos" => Some(("kg", Weight)),
        "oz" | "ounce" | "ounces" => Some(("oz", Weight)),
        "lb" | "lbs" | "pound" | "pounds" => Some(("lb", Weight)),
        // Temperature
        "c" | "°c" | "celsius" => Some(("c", Temperature)),
        "f" | "°f" | "fahrenheit" => Some(("f", Temperature)),
        "k" | "kelvin" => Some(("k", Temperature)),
        _ => None,
    }
}

static RE_AMOUNT_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([+-]?\d+(?:\.\d+)?)\s*(°?[a-zA-Z]+|["'])"#)
        .expect("Failed to compile amount/unit pattern")
});

static RE_UNIT_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(°?[a-zA-Z]+)\s*([+-]?\d+(?:\.\d+)?)")
        .expect("Failed to compile unit/amount pattern")
});

/// Extract the first amount/unit pair from free text ("12 km", "3.5 meters", "100°F")
pub fn parse_quantity(text: &str) -> CommandResult<ParseUnitResponse> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CommandError::InvalidInput("Empty text".to_string()));
    }

    // Comma decimal separators
    let normalized = text.replace(',', ".");

    for caps in RE_AMOUNT_UNIT.captures_iter(&normalized) {
        if let (Ok(amount), Some((unit, category))) = (caps[1].parse::<f64>(), normalize_unit(&caps[2])) {
            tracing::debug!("[parse_quantity] Extracted {} {} from '{}'", amount, unit, text);
            return Ok(ParseUnitResponse { amount, unit: unit.to_string(), category });
        }
    }

    for caps in RE_UNIT_AMOUNT.captures_iter(&normalized) {
        if let (Some((unit, category)), Ok(amount)) = (normalize_unit(&caps[1]), caps[2].parse::<f64>()) {
            tracing::debug!("[parse_quantity] Extracted {} {} from '{}'", amount, unit, text);
            return Ok(ParseUnitResponse { amount, unit: unit.to_string(), category });
        }
    }

    Err(CommandError::InvalidInput(format!("{}: {}", ERR_CANNOT_PARSE_UNIT, text)))
}
