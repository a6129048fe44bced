//! Numeric core of the utility widgets: calculator, unit converter and
//! currency converter.
//!
//! The web shell owns rendering; this crate owns the math and the rate
//! table, and reports user-facing messages through a [`Notifier`].

pub mod core;
pub mod shared;

pub use crate::core::features::calculator::{Calculator, Operator, ScientificFunction};
pub use crate::core::features::currency::{CurrencyService, HttpRateProvider, RateProvider};
pub use crate::shared::settings::AppSettings;
pub use crate::shared::{CommandError, CommandResult, Notifier, RecordingNotifier, TracingNotifier};

/// Install the fmt subscriber; `RUST_LOG` overrides the default `info` level.
///
/// Safe to call more than once: later calls leave the first subscriber in place.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok() {
        tracing::debug!("[init_logging] subscriber installed");
    }
}
