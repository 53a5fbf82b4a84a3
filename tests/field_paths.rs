use confwatch::config::fields::{FIELDS, FieldKind, FieldPath, camel_name, lookup};
use confwatch::config::{ConfigModel, SettingsSection};

#[test]
fn table_rows_follow_variant_order() {
    for (i, spec) in FIELDS.iter().enumerate() {
        assert_eq!(spec.path as usize, i, "row {i} is {:?}", spec.path);
        assert!(std::ptr::eq(spec.path.spec(), spec));
    }
}

#[test]
fn camel_names_derive_from_disk_keys() {
    for spec in FIELDS.iter() {
        assert_eq!(spec.name, camel_name(spec.section, spec.key));
    }
    assert_eq!(
        camel_name("settings", "interface-shift-x"),
        "settingsInterfaceShiftX"
    );
}

#[test]
fn every_field_parses_from_camel_dotted_and_hyphenated_forms() {
    for spec in FIELDS.iter() {
        let dotted = spec.disk_key();
        let hyphenated = format!("{}-{}", spec.section, spec.key);

        assert_eq!(spec.name.parse::<FieldPath>(), Ok(spec.path));
        assert_eq!(dotted.parse::<FieldPath>(), Ok(spec.path));
        assert_eq!(hyphenated.parse::<FieldPath>(), Ok(spec.path));
    }
}

#[test]
fn unknown_paths_do_not_resolve() {
    for bad in [
        "",
        "settings",
        "settingslanguage",
        "SettingsLanguage",
        "settings.font-size",
        "vehicle.language",
        "settings..language",
    ] {
        assert!(lookup(bad).is_none(), "{bad:?} should not resolve");
        assert!(bad.parse::<FieldPath>().is_err());
    }
}

#[test]
fn display_uses_camel_name() {
    assert_eq!(FieldPath::VehicleFuelMode.to_string(), "vehicleFuelMode");
    assert_eq!(FieldPath::all().count(), FIELDS.len());
}

#[test]
fn kinds_match_the_schema() {
    let theme = &FieldPath::SettingsTheme.spec().kind;
    assert_eq!(theme.tokens(), Some(&["auto", "light", "dark"][..]));
    assert!(theme.range().is_none());

    assert_eq!(
        FieldPath::VehicleDriveMode.spec().kind.tokens(),
        Some(&["eco", "comfort", "sport", "snow", "outing", "individual"][..])
    );

    let shift = &FieldPath::SettingsInterfaceShiftY.spec().kind;
    assert_eq!(shift.range(), Some(&(-100..=100)));
    assert!(shift.tokens().is_none());
    assert!(matches!(shift, FieldKind::Integer { .. }));
}

#[test]
fn getters_see_through_absent_sections() {
    let empty = ConfigModel::default();
    let empty_settings = ConfigModel {
        settings: Some(SettingsSection::default()),
        vehicle: None,
    };

    for spec in FIELDS.iter() {
        assert_eq!(spec.read(&empty), None);
        assert_eq!(spec.read(&empty_settings), None);
    }
}
