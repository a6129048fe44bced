use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;

use crate::shared::errors::CommandError;
use crate::shared::notify::Notifier;
use crate::shared::settings::{AppSettings, RateSettings, UserPreferences};
use crate::shared::types::NotificationKind;

use super::currency_name;
use super::rates::{self, fallback_table};
use super::types::{
    ConvertCurrencyRequest, ConvertCurrencyResponse, CurrencyResult, RateSource, RateTable, RatesApiResponse,
};

/// Remote supplier of a rate table
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self) -> CurrencyResult<RateTable>;
}

/// Fetches a single-base rates document over HTTP
pub struct HttpRateProvider {
    http: Client,
    endpoint: String,
}

impl HttpRateProvider {
    pub fn new(settings: &RateSettings) -> CurrencyResult<Self> {
        let http = Client::builder()
            .user_agent("utility-widgets/currency")
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| CommandError::NetworkError(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
        })
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    async fn fetch_rates(&self) -> CurrencyResult<RateTable> {
        tracing::debug!("[Currency] Fetching rates from {}", self.endpoint);
        let resp = self.http.get(&self.endpoint).send().await?;

        if !resp.status().is_success() {
            return Err(CommandError::NetworkError(format!(
                "Failed to fetch rates: {}",
                resp.status()
            )));
        }

        let json: RatesApiResponse = resp
            .json()
            .await
            .map_err(|e| CommandError::InvalidInput(format!("Invalid response: {}", e)))?;

        if !json.result.eq_ignore_ascii_case("success") {
            return Err(CommandError::NetworkError("API reported failure".into()));
        }

        let base = rates::normalize_code(&json.base_code);
        let mut targets = json.rates;
        targets.remove(&base);

        let mut table = RateTable::new();
        table.insert(base, targets);
        Ok(table)
    }
}

/// Upper bound on configured retries
pub const MAX_RETRIES: u32 = 5;

/// Owns the active rate table for one currency widget
pub struct CurrencyService {
    provider: Arc<dyn RateProvider>,
    notifier: Arc<dyn Notifier>,
    retries: u32,
    source: RateSource,
    fetched_at: Option<DateTime<Utc>>,
    failure_notified: bool,
    default_pair: (String, String),
}

impl CurrencyService {
    /// Starts on the fallback table until [`CurrencyService::load`] succeeds.
    /// `retries` is clamped to [`MAX_RETRIES`].
    pub fn new(provider: Arc<dyn RateProvider>, notifier: Arc<dyn Notifier>, retries: u32) -> Self {
        if retries > MAX_RETRIES {
            tracing::warn!("[Currency] {} retries requested, using {}", retries, MAX_RETRIES);
        }
        Self {
            provider,
            notifier,
            retries: retries.min(MAX_RETRIES),
            source: RateSource::Fallback(fallback_table()),
            fetched_at: None,
            failure_notified: false,
            default_pair: preferred_pair(&UserPreferences::default()),
        }
    }

    pub fn from_settings(settings: &AppSettings, notifier: Arc<dyn Notifier>) -> CurrencyResult<Self> {
        let provider = HttpRateProvider::new(&settings.rates)?;
        Ok(Self::new(Arc::new(provider), notifier, settings.rates.retries).with_preferences(&settings.preferences))
    }

    /// Use the preferred pair as the initial selection
    pub fn with_preferences(mut self, preferences: &UserPreferences) -> Self {
        self.default_pair = preferred_pair(preferences);
        self
    }

    /// (from, to) the widget opens with
    pub fn default_pair(&self) -> (&str, &str) {
        (&self.default_pair.0, &self.default_pair.1)
    }

    /// Fetch rates, retrying the configured number of times; on failure the
    /// fallback table becomes active and the user is told once.
    pub async fn load(&mut self) -> &RateSource {
        let attempts = self.retries.saturating_add(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match self.provider.fetch_rates().await {
                Ok(table) => {
                    let pairs: usize = table.values().map(|targets| targets.len()).sum();
                    tracing::info!("[Currency] Loaded {} live rates (attempt {}/{})", pairs, attempt, attempts);
                    self.source = RateSource::Live(table);
                    self.fetched_at = Some(Utc::now());
                    return &self.source;
                }
                Err(e) => {
                    tracing::warn!("[Currency] Rate fetch failed (attempt {}/{}): {}", attempt, attempts, e);
                    last_error = Some(e);
                }
            }
        }

        self.source = RateSource::Fallback(fallback_table());
        self.fetched_at = None;

        if !self.failure_notified {
            self.failure_notified = true;
            let reason = last_error.map(|e| e.to_string()).unwrap_or_default();
            self.notifier.notify(
                NotificationKind::Error,
                &format!("Error fetching rates: {}. Using offline rates.", reason),
            );
        }

        &self.source
    }

    pub fn source(&self) -> &RateSource {
        &self.source
    }

    pub fn is_live(&self) -> bool {
        self.source.is_live()
    }

    /// Convert with the active table; failures are also reported to the notifier
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> CurrencyResult<String> {
        rates::convert(amount, from, to, self.source.table()).map_err(|e| self.report(e))
    }

    pub fn convert_text(&self, text: &str, from: &str, to: &str) -> CurrencyResult<String> {
        rates::convert_text(text, from, to, self.source.table()).map_err(|e| self.report(e))
    }

    pub fn convert_request(&self, request: &ConvertCurrencyRequest) -> CurrencyResult<ConvertCurrencyResponse> {
        let (result, rate) = rates::convert_amount(request.amount, &request.from, &request.to, self.source.table())
            .map_err(|e| self.report(e))?;

        Ok(ConvertCurrencyResponse {
            result: rates::format_amount(result),
            rate,
            source: self.source.label().to_string(),
            timestamp: self.fetched_at.map(|ts| ts.to_rfc3339()),
        })
    }

    fn report(&self, err: CommandError) -> CommandError {
        self.notifier.notify(NotificationKind::Error, &err.to_string());
        err
    }
}

/// Preferred pair if both codes are in the catalogue, else the built-in USD -> EUR
fn preferred_pair(preferences: &UserPreferences) -> (String, String) {
    let from = rates::normalize_code(&preferences.default_currency_from);
    let to = rates::normalize_code(&preferences.default_currency_to);

    if currency_name(&from).is_some() && currency_name(&to).is_some() {
        return (from, to);
    }

    tracing::warn!("[Currency] Ignoring unsupported default pair {} -> {}", from, to);
    let fallback = UserPreferences::default();
    (fallback.default_currency_from, fallback.default_currency_to)
}
