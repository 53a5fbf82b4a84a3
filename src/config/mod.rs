// src/config/mod.rs

//! Configuration schema, parsing and validation.
//!
//! Responsibilities:
//! - Define the YAML-backed raw document and the typed model (`model.rs`).
//! - Describe every leaf field in one table (`fields.rs`).
//! - Read and parse a config file from disk (`loader.rs`).
//! - Turn a raw document into a validated model (`validate.rs`).

pub mod fields;
pub mod loader;
pub mod model;
pub mod validate;

pub use fields::{FIELDS, FieldKind, FieldPath, FieldSpec, FieldValue};
pub use loader::{load_and_validate, load_from_path, parse};
pub use model::{ConfigModel, RawConfig, RawSettings, RawVehicle, SettingsSection, VehicleSection};
pub use validate::{is_valid_config, validate};
