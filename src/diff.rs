// src/diff.rs

//! Field-level diffing between two accepted configurations.
//!
//! The differ knows nothing about individual fields: it walks
//! [`FIELDS`](crate::config::FIELDS) and uses each row's getter and
//! comparator.

use std::collections::BTreeMap;

use crate::config::fields::{FIELDS, FieldPath, FieldValue, lookup};
use crate::config::model::ConfigModel;

/// What to report when there is no previous model to compare against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialDiff {
    /// First load carries no diff.
    #[default]
    Empty,
    /// Every field present in the new model counts as changed.
    AllFields,
}

/// Old and new value of one changed field. `None` means absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldChange {
    pub previous: Option<FieldValue>,
    pub current: Option<FieldValue>,
}

/// Sparse set of changed fields.
///
/// A field has an entry only if it changed; an empty diff means nothing
/// observable changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffModel {
    changes: BTreeMap<FieldPath, FieldChange>,
}

impl DiffModel {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn get(&self, field: FieldPath) -> Option<&FieldChange> {
        self.changes.get(&field)
    }

    pub fn contains(&self, field: FieldPath) -> bool {
        self.changes.contains_key(&field)
    }

    /// Changed fields in table order.
    pub fn changed_fields(&self) -> impl Iterator<Item = FieldPath> + '_ {
        self.changes.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldPath, &FieldChange)> + '_ {
        self.changes.iter().map(|(k, v)| (*k, v))
    }
}

/// Compare `current` against `previous`, field by field.
///
/// A field is changed when its value differs, including when it appears or
/// disappears. With no `previous`, `policy` decides.
pub fn diff(previous: Option<&ConfigModel>, current: &ConfigModel, policy: InitialDiff) -> DiffModel {
    let mut changes = BTreeMap::new();

    let Some(previous) = previous else {
        if policy == InitialDiff::AllFields {
            for spec in FIELDS.iter() {
                if let Some(value) = spec.read(current) {
                    changes.insert(
                        spec.path,
                        FieldChange {
                            previous: None,
                            current: Some(value),
                        },
                    );
                }
            }
        }
        return DiffModel { changes };
    };

    for spec in FIELDS.iter() {
        let before = spec.read(previous);
        let after = spec.read(current);
        if !(spec.same)(before.as_ref(), after.as_ref()) {
            changes.insert(
                spec.path,
                FieldChange {
                    previous: before,
                    current: after,
                },
            );
        }
    }

    DiffModel { changes }
}

pub fn has_any_change(diff: &DiffModel) -> bool {
    !diff.is_empty()
}

/// Whether `field_path` changed in `diff`.
///
/// `false` when there is no diff or the path is unknown.
pub fn is_field_changed(diff: Option<&DiffModel>, field_path: &str) -> bool {
    match (diff, lookup(field_path)) {
        (Some(diff), Some(spec)) => diff.contains(spec.path),
        _ => false,
    }
}
