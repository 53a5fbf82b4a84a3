mod common;

use std::sync::Arc;

use confwatch::config::{ConfigModel, FieldValue, SettingsSection};
use confwatch::errors::{ConfwatchError, ValidationError};
use confwatch::manager::{ConfigManager, WatchState};
use confwatch::types::Language;
use confwatch_test_utils::{DocumentBuilder, RecordingListener, TempConfig, init_tracing};

use crate::common::{TestResult, fixture};

#[test]
fn load_config_stores_last_known_good() -> TestResult {
    init_tracing();
    let manager = ConfigManager::new();
    assert!(manager.current().is_none());
    assert_eq!(manager.get_field_value("settingsLanguage"), None);

    let loaded = manager.load_config(fixture("full.yaml"))?;

    let current = manager.current().expect("config stored");
    assert!(Arc::ptr_eq(&loaded, &current));
    assert_eq!(
        manager.get_field_value("settingsLanguage"),
        Some(FieldValue::Token("ru"))
    );
    assert_eq!(
        manager.get_field_value("settings.interface-shift-y"),
        Some(FieldValue::Integer(-7))
    );
    Ok(())
}

#[test]
fn failed_load_leaves_previous_state_untouched() -> TestResult {
    init_tracing();
    let manager = ConfigManager::new();
    let good = manager.load_config(fixture("full.yaml"))?;

    let err = manager
        .load_config(fixture("bogus_fuel_mode.yaml"))
        .expect_err("bogus fuel mode");
    assert!(matches!(
        err,
        ConfwatchError::Validation(ValidationError::UnknownToken { .. })
    ));

    let err = manager
        .load_config(fixture("wrong_type.yaml"))
        .expect_err("wrong type");
    assert!(matches!(err, ConfwatchError::Parse(_)));

    let err = manager
        .load_config(fixture("missing.yaml"))
        .expect_err("missing file");
    assert!(matches!(err, ConfwatchError::Io { .. }));

    let current = manager.current().expect("still loaded");
    assert!(Arc::ptr_eq(&good, &current));
    assert_eq!(
        manager.get_field_value("vehicleFuelMode"),
        Some(FieldValue::Token("electric"))
    );
    Ok(())
}

#[test]
fn unset_or_unknown_fields_read_as_none() -> TestResult {
    let cfg = TempConfig::new(&DocumentBuilder::new().language("en").build());
    let manager = ConfigManager::new();
    manager.load_config(cfg.path())?;

    assert_eq!(
        manager.get_field_value("settingsLanguage"),
        Some(FieldValue::Token("en"))
    );
    assert_eq!(manager.get_field_value("settingsTheme"), None);
    assert_eq!(manager.get_field_value("vehicleDriveMode"), None);
    assert_eq!(manager.get_field_value("settingsFontSize"), None);
    Ok(())
}

#[test]
fn load_config_returns_the_typed_model() -> TestResult {
    init_tracing();
    let cfg = TempConfig::new("settings:\n  language: en\n");
    let manager = ConfigManager::new();

    let loaded = manager.load_config(cfg.path())?;

    assert_eq!(
        loaded.settings.as_ref().and_then(|s| s.language),
        Some(Language::En)
    );
    assert!(loaded.vehicle.is_none());
    assert_eq!(manager.state(), WatchState::Idle);
    Ok(())
}

#[test]
fn manager_delegates_diff_and_validity_helpers() -> TestResult {
    let manager = ConfigManager::new();
    let a = manager.load_config(fixture("full.yaml"))?;
    let b = manager.load_config(fixture("partial.yaml"))?;

    let d = confwatch::diff::diff(Some(a.as_ref()), &b, Default::default());
    assert!(manager.has_any_change(&d));
    assert!(manager.is_field_changed(Some(&d), "settingsTheme"));
    assert!(!manager.is_field_changed(None, "settingsTheme"));

    assert!(manager.is_valid_config(&b));
    let invalid = ConfigModel {
        settings: Some(SettingsSection {
            interface_shift_y: Some(-101),
            ..SettingsSection::default()
        }),
        vehicle: None,
    };
    assert!(!manager.is_valid_config(&invalid));
    Ok(())
}

#[test]
fn start_watching_outside_a_runtime_is_a_setup_error() {
    init_tracing();
    let cfg = TempConfig::new(&DocumentBuilder::full().build());
    let manager = ConfigManager::new();

    let err = manager
        .start_watching(cfg.path(), RecordingListener::new())
        .expect_err("no tokio runtime");

    assert!(matches!(err, ConfwatchError::WatchSetup { .. }));
    assert_eq!(manager.state(), WatchState::Idle);
}

#[test]
fn stop_watching_when_idle_is_a_no_op() {
    let manager = ConfigManager::new();
    manager.stop_watching();
    manager.stop_watching();
    assert_eq!(manager.state(), WatchState::Idle);
    assert!(manager.watched_path().is_none());
}
