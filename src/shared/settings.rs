use serde::{Deserialize, Serialize};
use ts_rs::TS;
use tokio::fs;
use std::path::{Path, PathBuf};
use directories::ProjectDirs;

use super::errors::{CommandError, CommandResult};
use super::types::UnitCategory;

pub const DEFAULT_RATES_ENDPOINT: &str = "https://open.er-api.com/v6/latest/USD";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "settings.ts")]
pub struct AppSettings {
    pub rates: RateSettings,
    pub preferences: UserPreferences,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "settings.ts")]
pub struct RateSettings {
    /// USD-based rates document
    pub endpoint: String,
    pub timeout_secs: u64,
    /// Extra attempts after the first failed fetch
    pub retries: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "settings.ts")]
pub struct UserPreferences {
    pub default_currency_from: String,
    pub default_currency_to: String,
    pub default_unit_category: UnitCategory,
}

impl Default for RateSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_RATES_ENDPOINT.to_string(),
            timeout_secs: 10,
            retries: 1,
        }
    }
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            default_currency_from: "USD".to_string(),
            default_currency_to: "EUR".to_string(),
            default_unit_category: UnitCategory::Length,
        }
    }
}

impl AppSettings {
    pub fn get_settings_path() -> CommandResult<PathBuf> {
        ProjectDirs::from("com", "antigravity", "utility-widgets")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| CommandError::SystemIO("Failed to determine config directory".to_string()))
    }

    /// Load from the platform config directory, writing defaults on first run
    pub async fn load() -> CommandResult<Self> {
        let path = Self::get_settings_path()?;
        Self::load_from(&path).await
    }

    pub async fn load_from(path: &Path) -> CommandResult<Self> {
        if !path.exists() {
            tracing::info!("[Settings] No settings at {}, writing defaults", path.display());
            let settings = Self::default();
            settings.save_to(path).await?;
            return Ok(settings);
        }

        let content = fs::read_to_string(path).await
            .map_err(|e| CommandError::SystemIO(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| CommandError::InvalidInput(format!("Failed to parse settings: {}", e)))
    }

    pub async fn save(&self) -> CommandResult<()> {
        let path = Self::get_settings_path()?;
        self.save_to(&path).await
    }

    pub async fn save_to(&self, path: &Path) -> CommandResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await
                .map_err(|e| CommandError::SystemIO(format!("Failed to create config directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)?;

        fs::write(path, content).await
            .map_err(|e| CommandError::SystemIO(format!("Failed to write settings file: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = AppSettings::load_from(&path).await.unwrap();
        assert_eq!(settings, AppSettings::default());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = AppSettings::default();
        settings.rates.timeout_secs = 3;
        settings.preferences.default_currency_to = "GBP".to_string();
        settings.preferences.default_unit_category = UnitCategory::Temperature;
        settings.save_to(&path).await.unwrap();

        let loaded = AppSettings::load_from(&path).await.unwrap();
        assert_eq!(loaded, settings);
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, r#"{"rates":{"retries":0}}"#).await.unwrap();

        let loaded = AppSettings::load_from(&path).await.unwrap();
        assert_eq!(loaded.rates.retries, 0);
        assert_eq!(loaded.rates.endpoint, DEFAULT_RATES_ENDPOINT);
        assert_eq!(loaded.preferences.default_currency_from, "USD");
    }

    #[tokio::test]
    async fn test_malformed_file_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        let err = AppSettings::load_from(&path).await.unwrap_err();
        assert!(matches!(err, CommandError::InvalidInput(_)));
    }
}
