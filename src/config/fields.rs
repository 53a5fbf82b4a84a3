// src/config/fields.rs

//! Flat field-path addressing over the nested configuration model.
//!
//! [`FIELDS`] is the single table describing every leaf: where it lives on
//! disk, how to read it out of a [`ConfigModel`], what values it accepts and
//! how two values are compared. Lookup by name, diffing and validation all
//! walk this table, so a new leaf needs one new row and nothing else.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::config::model::ConfigModel;
use crate::types::{DriveMode, FuelMode, Language, Theme};

/// Accepted range for both interface shift offsets.
pub const INTERFACE_SHIFT_RANGE: RangeInclusive<i64> = -100..=100;

/// Identifies one leaf field, independent of nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldPath {
    SettingsLanguage,
    SettingsTheme,
    SettingsInterfaceShiftX,
    SettingsInterfaceShiftY,
    VehicleFuelMode,
    VehicleDriveMode,
}

/// A leaf value as seen through a field path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    Token(&'static str),
    Integer(i64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Token(t) => f.write_str(t),
            FieldValue::Integer(n) => write!(f, "{n}"),
        }
    }
}

/// Declared legal values for a field, together with its typed getter.
///
/// Pairing the getter with the kind means a token field can only ever yield
/// a token and an integer field an integer.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Token {
        allowed: &'static [&'static str],
        get: fn(&ConfigModel) -> Option<&'static str>,
    },
    Integer {
        range: RangeInclusive<i64>,
        get: fn(&ConfigModel) -> Option<i64>,
    },
}

impl FieldKind {
    pub fn read(&self, model: &ConfigModel) -> Option<FieldValue> {
        match self {
            FieldKind::Token { get, .. } => get(model).map(FieldValue::Token),
            FieldKind::Integer { get, .. } => get(model).map(FieldValue::Integer),
        }
    }

    /// Accepted tokens; `None` for integer fields.
    pub fn tokens(&self) -> Option<&'static [&'static str]> {
        match self {
            FieldKind::Token { allowed, .. } => Some(*allowed),
            FieldKind::Integer { .. } => None,
        }
    }

    /// Accepted range; `None` for token fields.
    pub fn range(&self) -> Option<&RangeInclusive<i64>> {
        match self {
            FieldKind::Integer { range, .. } => Some(range),
            FieldKind::Token { .. } => None,
        }
    }
}

/// One row of the field table.
#[derive(Debug)]
pub struct FieldSpec {
    pub path: FieldPath,
    /// Flat camel-case name, e.g. `settingsInterfaceShiftX`.
    pub name: &'static str,
    /// Top-level section on disk.
    pub section: &'static str,
    /// Hyphenated key inside the section.
    pub key: &'static str,
    pub kind: FieldKind,
    pub same: fn(Option<&FieldValue>, Option<&FieldValue>) -> bool,
}

impl FieldSpec {
    /// Dotted on-disk key, e.g. `settings.interface-shift-x`.
    pub fn disk_key(&self) -> String {
        format!("{}.{}", self.section, self.key)
    }

    pub fn read(&self, model: &ConfigModel) -> Option<FieldValue> {
        self.kind.read(model)
    }
}

fn same_value(a: Option<&FieldValue>, b: Option<&FieldValue>) -> bool {
    a == b
}

pub static FIELDS: [FieldSpec; 6] = [
    FieldSpec {
        path: FieldPath::SettingsLanguage,
        name: "settingsLanguage",
        section: "settings",
        key: "language",
        kind: FieldKind::Token {
            allowed: Language::TOKENS,
            get: |m| m.settings.as_ref()?.language.map(Language::as_str),
        },
        same: same_value,
    },
    FieldSpec {
        path: FieldPath::SettingsTheme,
        name: "settingsTheme",
        section: "settings",
        key: "theme",
        kind: FieldKind::Token {
            allowed: Theme::TOKENS,
            get: |m| m.settings.as_ref()?.theme.map(Theme::as_str),
        },
        same: same_value,
    },
    FieldSpec {
        path: FieldPath::SettingsInterfaceShiftX,
        name: "settingsInterfaceShiftX",
        section: "settings",
        key: "interface-shift-x",
        kind: FieldKind::Integer {
            range: INTERFACE_SHIFT_RANGE,
            get: |m| m.settings.as_ref()?.interface_shift_x,
        },
        same: same_value,
    },
    FieldSpec {
        path: FieldPath::SettingsInterfaceShiftY,
        name: "settingsInterfaceShiftY",
        section: "settings",
        key: "interface-shift-y",
        kind: FieldKind::Integer {
            range: INTERFACE_SHIFT_RANGE,
            get: |m| m.settings.as_ref()?.interface_shift_y,
        },
        same: same_value,
    },
    FieldSpec {
        path: FieldPath::VehicleFuelMode,
        name: "vehicleFuelMode",
        section: "vehicle",
        key: "fuel-mode",
        kind: FieldKind::Token {
            allowed: FuelMode::TOKENS,
            get: |m| m.vehicle.as_ref()?.fuel_mode.map(FuelMode::as_str),
        },
        same: same_value,
    },
    FieldSpec {
        path: FieldPath::VehicleDriveMode,
        name: "vehicleDriveMode",
        section: "vehicle",
        key: "drive-mode",
        kind: FieldKind::Token {
            allowed: DriveMode::TOKENS,
            get: |m| m.vehicle.as_ref()?.drive_mode.map(DriveMode::as_str),
        },
        same: same_value,
    },
];

impl FieldPath {
    pub fn spec(self) -> &'static FieldSpec {
        // Table rows are in variant order.
        &FIELDS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn all() -> impl Iterator<Item = FieldPath> {
        FIELDS.iter().map(|f| f.path)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldPath {
    type Err = String;

    /// Accepts `settingsTheme`, `settings.theme` or `settings-theme`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        FIELDS
            .iter()
            .find(|f| {
                f.name == s
                    || s.strip_prefix(f.section)
                        .and_then(|rest| rest.strip_prefix(['.', '-']))
                        .is_some_and(|rest| rest == f.key)
            })
            .map(|f| f.path)
            .ok_or_else(|| format!("unknown field path: {s:?}"))
    }
}

/// Derive the flat camel-case name for an on-disk `section` / `key` pair.
///
/// `("settings", "interface-shift-x")` becomes `settingsInterfaceShiftX`.
pub fn camel_name(section: &str, key: &str) -> String {
    let mut out = String::with_capacity(section.len() + key.len());
    out.push_str(section);
    for word in key.split('-').filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Resolve a field path string; `None` for unknown paths.
pub fn lookup(field_path: &str) -> Option<&'static FieldSpec> {
    field_path.parse::<FieldPath>().ok().map(FieldPath::spec)
}
