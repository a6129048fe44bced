use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use utility_widgets_lib::core::features::currency::{RateTable, types::CurrencyResult};
use utility_widgets_lib::core::features::unit_converter;
use utility_widgets_lib::shared::types::{NotificationKind, UnitCategory};
use utility_widgets_lib::{
    AppSettings, Calculator, CommandError, CurrencyService, Operator, RateProvider, RecordingNotifier,
    ScientificFunction,
};

struct FixedProvider(Option<RateTable>);

#[async_trait]
impl RateProvider for FixedProvider {
    async fn fetch_rates(&self) -> CurrencyResult<RateTable> {
        self.0
            .clone()
            .ok_or_else(|| CommandError::NetworkError("offline".to_string()))
    }
}

fn usd_eur() -> RateTable {
    HashMap::from([(
        "USD".to_string(),
        HashMap::from([("EUR".to_string(), Decimal::new(85, 2))]),
    )])
}

#[test]
fn unit_round_trips_stay_close() {
    for category in UnitCategory::ALL {
        let units = unit_converter::units_for_category(category);
        for from in &units {
            for to in &units {
                let there = unit_converter::convert_value(37.5, &from.id, &to.id, category).unwrap();
                let back = unit_converter::convert_value(there, &to.id, &from.id, category).unwrap();
                assert!((back - 37.5).abs() < 1e-3, "{} -> {} -> {}", from.id, to.id, from.id);
            }
        }
    }
}

#[test]
fn unit_reference_values() {
    assert_eq!(
        unit_converter::convert(1.0, "km", "m", UnitCategory::Length).unwrap(),
        "1000.000000"
    );
    let f: f64 = unit_converter::convert(0.0, "c", "f", UnitCategory::Temperature)
        .unwrap()
        .parse()
        .unwrap();
    assert!((f - 32.0).abs() < 1e-9);
    let k: f64 = unit_converter::convert(100.0, "c", "k", UnitCategory::Temperature)
        .unwrap()
        .parse()
        .unwrap();
    assert!((k - 373.15).abs() < 1e-9);
    assert!(matches!(
        unit_converter::convert_text("abc", "m", "km", UnitCategory::Length),
        Err(CommandError::NonFiniteInput(_))
    ));
}

#[tokio::test]
async fn currency_live_then_offline() {
    let notifier = RecordingNotifier::new();
    let mut live = CurrencyService::new(
        Arc::new(FixedProvider(Some(usd_eur()))),
        Arc::new(notifier.clone()),
        1,
    );
    assert!(live.load().await.is_live());
    assert_eq!(live.convert(10.0, "USD", "EUR").unwrap(), "8.50");
    assert_eq!(live.convert(10.0, "EUR", "USD").unwrap(), "11.76");
    assert!(notifier.notifications().is_empty());

    let mut offline = CurrencyService::new(Arc::new(FixedProvider(None)), Arc::new(notifier.clone()), 1);
    assert!(!offline.load().await.is_live());
    assert_eq!(offline.convert(1.0, "USD", "USD").unwrap(), "1.00");
    assert_eq!(offline.convert_text("100", "USD", "GBP").unwrap(), "79.00");

    let notes = notifier.drain();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::Error);
}

#[test]
fn calculator_session() {
    let notifier = RecordingNotifier::new();
    let mut calc = Calculator::new(Arc::new(notifier.clone()));

    calc.input_digit('6').unwrap();
    calc.perform_operation(Operator::Multiply).unwrap();
    calc.input_digit('7').unwrap();
    calc.equals().unwrap();
    assert_eq!(calc.display(), "42");

    calc.apply_function(ScientificFunction::Sqrt).unwrap();
    assert!(calc.display().starts_with("6.48"));

    assert_eq!(calc.evaluate_expression("(2+3)*4").unwrap(), 20.0);
    assert_eq!(calc.evaluate_expression("5/0").unwrap_err(), CommandError::DivisionByZero);
    assert_eq!(calc.display(), "20");

    let history = calc.history();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].expression, "(2+3)*4");

    let snapshot = serde_json::to_value(calc.snapshot()).unwrap();
    assert_eq!(snapshot["display"], "20");
    assert_eq!(snapshot["awaitingNewOperand"], true);

    let errors: Vec<_> = notifier
        .notifications()
        .into_iter()
        .filter(|n| n.kind == NotificationKind::Error)
        .collect();
    assert_eq!(errors.len(), 1);
}

#[tokio::test]
async fn settings_drive_the_currency_service() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let mut settings = AppSettings::load_from(&path).await.unwrap();
    assert!(path.exists());
    settings.rates.retries = 0;
    settings.save_to(&path).await.unwrap();

    let reloaded = AppSettings::load_from(&path).await.unwrap();
    assert_eq!(reloaded.rates.retries, 0);

    let service = CurrencyService::from_settings(&reloaded, Arc::new(RecordingNotifier::new())).unwrap();
    assert!(!service.is_live());
    assert_eq!(service.default_pair(), ("USD", "EUR"));
}

#[test]
fn logging_init_is_idempotent() {
    utility_widgets_lib::init_logging();
    utility_widgets_lib::init_logging();
}
