mod common;

use std::fs;

use clap::Parser;

use confwatch::cli::CliArgs;
use confwatch::config::loader::{default_config_path, default_config_template};
use confwatch::config::{ConfigModel, load_and_validate, parse};
use confwatch::diff::{InitialDiff, diff};
use confwatch::logging::parse_level_str;
use confwatch::{provision_default, render_config};
use confwatch_test_utils::{DocumentBuilder, TempConfig};

use crate::common::{TestResult, fixture};

#[test]
fn cli_defaults() -> TestResult {
    let args = CliArgs::try_parse_from(["confwatch"])?;

    assert_eq!(args.config, default_config_path().to_string_lossy());
    assert!(!args.init);
    assert!(!args.once);
    assert_eq!(args.debounce_ms, 100);
    assert!(args.log_level.is_none());
    Ok(())
}

#[test]
fn cli_flags_are_parsed() -> TestResult {
    let args = CliArgs::try_parse_from([
        "confwatch",
        "--config",
        "/etc/car/config.yaml",
        "--init",
        "--debounce-ms",
        "250",
        "--log-level",
        "debug",
    ])?;

    assert_eq!(args.config, "/etc/car/config.yaml");
    assert!(args.init);
    assert_eq!(args.debounce_ms, 250);
    assert!(args.log_level.is_some());

    assert!(CliArgs::try_parse_from(["confwatch", "--log-level", "loud"]).is_err());
    Ok(())
}

#[test]
fn log_level_names() {
    assert_eq!(parse_level_str("info"), Some(tracing::Level::INFO));
    assert_eq!(parse_level_str(" DEBUG "), Some(tracing::Level::DEBUG));
    assert_eq!(parse_level_str("warning"), Some(tracing::Level::WARN));
    assert_eq!(parse_level_str("verbose"), None);
}

#[test]
fn render_lists_every_field_by_section() -> TestResult {
    let cfg = load_and_validate(fixture("full.yaml"))?;

    let out = render_config(Some(&cfg), None);

    assert_eq!(
        out,
        "SETTINGS:\n\
         \x20 settingsLanguage: ru\n\
         \x20 settingsTheme: dark\n\
         \x20 settingsInterfaceShiftX: 12\n\
         \x20 settingsInterfaceShiftY: -7\n\
         \n\
         VEHICLE:\n\
         \x20 vehicleFuelMode: electric\n\
         \x20 vehicleDriveMode: sport\n"
    );
    Ok(())
}

#[test]
fn render_marks_changed_fields_and_unset_values() -> TestResult {
    let before = ConfigModel::try_from(parse(&DocumentBuilder::new().language("en").build())?)?;
    let after = ConfigModel::try_from(parse(
        &DocumentBuilder::new().language("ru").drive_mode("eco").build(),
    )?)?;
    let d = diff(Some(&before), &after, InitialDiff::Empty);

    let out = render_config(Some(&after), Some(&d));

    assert!(out.contains("* settingsLanguage: ru\n"), "{out}");
    assert!(out.contains("  settingsTheme: Not set\n"), "{out}");
    assert!(out.contains("* vehicleDriveMode: eco\n"), "{out}");
    assert!(out.contains("  vehicleFuelMode: Not set\n"), "{out}");
    Ok(())
}

#[test]
fn render_without_a_config_prints_every_field_unset() {
    let out = render_config(None, None);

    assert_eq!(out.matches("Not set").count(), 6);
    assert!(!out.contains('*'));
}

#[test]
fn provisioning_writes_the_template_only_once() -> TestResult {
    let cfg = TempConfig::new("");
    let path = cfg.dir().join("nested").join("config.yaml");

    assert!(provision_default(&path)?);
    assert_eq!(fs::read_to_string(&path)?, default_config_template());
    load_and_validate(&path)?;

    fs::write(&path, "settings:\n  language: ru\n")?;
    assert!(!provision_default(&path)?);
    assert_eq!(fs::read_to_string(&path)?, "settings:\n  language: ru\n");
    Ok(())
}
