use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ===== Notifications =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "widgets.ts")]
pub enum NotificationKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "widgets.ts")]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

// ===== Unit converter =====

/// Unit categories for type-safe conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "widgets.ts")]
pub enum UnitCategory {
    Length,
    Weight,
    Temperature,
}

impl UnitCategory {
    pub const ALL: [UnitCategory; 3] = [
        UnitCategory::Length,
        UnitCategory::Weight,
        UnitCategory::Temperature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitCategory::Length => "length",
            UnitCategory::Weight => "weight",
            UnitCategory::Temperature => "temperature",
        }
    }
}

impl std::str::FromStr for UnitCategory {
    type Err = crate::shared::errors::CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "length" => Ok(UnitCategory::Length),
            "weight" | "mass" => Ok(UnitCategory::Weight),
            "temperature" | "temp" => Ok(UnitCategory::Temperature),
            other => Err(crate::shared::errors::CommandError::InvalidInput(format!(
                "Unknown category: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "widgets.ts")]
pub struct ConvertUnitsRequest {
    pub value: f64,
    pub from_unit: String,
    pub to_unit: String,
    pub category: UnitCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "widgets.ts")]
pub struct ConvertUnitsResponse {
    pub result: f64,
    pub formatted_result: String,
    pub from_unit: String,
    pub to_unit: String,
}

// Rich Unit Data Transfer Object for frontend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "widgets.ts")]
pub struct UnitDTO {
    pub id: String,       // Unit code (e.g., "m", "kg")
    pub label: String,    // Display name (e.g., "Meters", "Kilograms")
    pub category: UnitCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "widgets.ts")]
pub struct ParseUnitResponse {
    pub amount: f64,
    pub unit: String,
    pub category: UnitCategory,
}

// ===== Currency =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "widgets.ts")]
pub struct CurrencyDTO {
    pub code: String,
    pub name: String,
}

// ===== Calculator =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "widgets.ts")]
pub struct HistoryEntry {
    pub expression: String,
    pub result: String,
    #[ts(type = "string")]
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Read-only view of the calculator for rendering
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "widgets.ts")]
pub struct CalculatorSnapshot {
    pub display: String,
    pub previous_operand: String,
    pub pending_operator: Option<String>,
    pub awaiting_new_operand: bool,
    pub memory: f64,
    pub history: Vec<HistoryEntry>,
}
