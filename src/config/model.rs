// src/config/model.rs

use serde::Deserialize;

use crate::types::{DriveMode, FuelMode, Language, Theme};

/// Configuration document as read from a YAML file, before validation.
///
/// ```yaml
/// settings:
///   language: en
///   theme: dark
///   interface-shift-x: 0
///   interface-shift-y: -4
///
/// vehicle:
///   fuel-mode: electric
///   drive-mode: comfort
/// ```
///
/// Every section and every key is optional. Unknown keys are ignored so
/// newer documents still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    pub settings: Option<RawSettings>,

    #[serde(default)]
    pub vehicle: Option<RawVehicle>,
}

/// `settings` section as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawSettings {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub interface_shift_x: Option<i64>,
    #[serde(default)]
    pub interface_shift_y: Option<i64>,
}

/// `vehicle` section as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawVehicle {
    #[serde(default)]
    pub fuel_mode: Option<String>,
    #[serde(default)]
    pub drive_mode: Option<String>,
}

/// Validated, typed configuration.
///
/// Build one with `ConfigModel::try_from(raw)` (see `validate.rs`); a
/// `None` section means the document did not mention it at all, which is
/// distinct from an empty `settings: {}` mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigModel {
    pub settings: Option<SettingsSection>,
    pub vehicle: Option<VehicleSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsSection {
    pub language: Option<Language>,
    pub theme: Option<Theme>,
    pub interface_shift_x: Option<i64>,
    pub interface_shift_y: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleSection {
    pub fuel_mode: Option<FuelMode>,
    pub drive_mode: Option<DriveMode>,
}
