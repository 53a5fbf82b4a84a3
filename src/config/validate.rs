// src/config/validate.rs

use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::config::fields::{FIELDS, FieldKind, FieldPath, INTERFACE_SHIFT_RANGE};
use crate::config::model::{
    ConfigModel, RawConfig, RawSettings, RawVehicle, SettingsSection, VehicleSection,
};
use crate::errors::{ConfwatchError, ValidationError};
use crate::types::{DriveMode, FuelMode, Language, Theme};

impl TryFrom<RawConfig> for ConfigModel {
    type Error = ConfwatchError;

    fn try_from(raw: RawConfig) -> std::result::Result<Self, Self::Error> {
        let model = ConfigModel {
            settings: raw.settings.map(settings_from_raw).transpose()?,
            vehicle: raw.vehicle.map(vehicle_from_raw).transpose()?,
        };
        validate(&model)?;
        Ok(model)
    }
}

/// Check every present field against its declared token set or range.
///
/// Absent fields always pass. Stops at the first offending field; nothing is
/// clamped.
pub fn validate(model: &ConfigModel) -> Result<(), ValidationError> {
    for spec in FIELDS.iter() {
        match &spec.kind {
            FieldKind::Token { allowed, get } => {
                if let Some(token) = get(model) {
                    check_token(spec.path, *allowed, token)?;
                }
            }
            FieldKind::Integer { range, get } => {
                if let Some(n) = get(model) {
                    check_range(spec.path, range, n)?;
                }
            }
        }
    }
    Ok(())
}

pub fn is_valid_config(model: &ConfigModel) -> bool {
    validate(model).is_ok()
}

fn settings_from_raw(raw: RawSettings) -> Result<SettingsSection, ValidationError> {
    Ok(SettingsSection {
        language: parse_token(FieldPath::SettingsLanguage, Language::TOKENS, raw.language)?,
        theme: parse_token(FieldPath::SettingsTheme, Theme::TOKENS, raw.theme)?,
        interface_shift_x: raw
            .interface_shift_x
            .map(|n| check_range(FieldPath::SettingsInterfaceShiftX, &INTERFACE_SHIFT_RANGE, n))
            .transpose()?,
        interface_shift_y: raw
            .interface_shift_y
            .map(|n| check_range(FieldPath::SettingsInterfaceShiftY, &INTERFACE_SHIFT_RANGE, n))
            .transpose()?,
    })
}

fn vehicle_from_raw(raw: RawVehicle) -> Result<VehicleSection, ValidationError> {
    Ok(VehicleSection {
        fuel_mode: parse_token(FieldPath::VehicleFuelMode, FuelMode::TOKENS, raw.fuel_mode)?,
        drive_mode: parse_token(FieldPath::VehicleDriveMode, DriveMode::TOKENS, raw.drive_mode)?,
    })
}

fn parse_token<T: FromStr>(
    field: FieldPath,
    allowed: &'static [&'static str],
    value: Option<String>,
) -> Result<Option<T>, ValidationError> {
    let Some(value) = value else {
        return Ok(None);
    };
    T::from_str(&value)
        .map(Some)
        .map_err(|_| ValidationError::UnknownToken {
            field,
            value,
            allowed,
        })
}

fn check_token(
    field: FieldPath,
    allowed: &'static [&'static str],
    token: &str,
) -> Result<(), ValidationError> {
    if allowed.contains(&token) {
        return Ok(());
    }
    Err(ValidationError::UnknownToken {
        field,
        value: token.to_string(),
        allowed,
    })
}

fn check_range(
    field: FieldPath,
    range: &RangeInclusive<i64>,
    value: i64,
) -> Result<i64, ValidationError> {
    if range.contains(&value) {
        return Ok(value);
    }
    Err(ValidationError::OutOfRange {
        field,
        value,
        min: *range.start(),
        max: *range.end(),
    })
}
