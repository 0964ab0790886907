//! Field-level diff engine
//!
//! Computes the change-set between two versions of a document's field map
//! and applies recorded change-sets back onto an accumulator (the fold
//! primitive shared with state reconstruction).
//!
//! # Invariants
//!
//! - Pure and deterministic: same inputs, same diff, no mutation of inputs
//! - A key absent from the old map diffs against `Null`
//! - Keys present only in the old map are not represented: the diff format
//!   cannot express field removal. Round-tripping a diff reproduces the new
//!   map restricted to its own keys, nothing more.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::{values_equal, FieldMap, Value};

/// Old and new value of one changed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub old: Value,
    pub new: Value,
}

/// Change-set of one mutation: field name to its old/new pair, changed
/// fields only. Ordered map so serialized diffs are deterministic.
pub type Diff = BTreeMap<String, FieldChange>;

/// Compute the field-level diff from `old_fields` to `new_fields`.
///
/// Iterates the keys of `new_fields`; a key missing from `old_fields`
/// contributes `Null` as its old side. A field is emitted only when old and
/// new differ under deep structural equality. CREATE diffs are computed by
/// passing an empty old map, which yields an all-null old side.
pub fn compute_diff(old_fields: &FieldMap, new_fields: &FieldMap) -> Diff {
    let mut diff = Diff::new();

    for (key, new_value) in new_fields {
        let old_value = old_fields.get(key).cloned().unwrap_or(Value::Null);

        if !values_equal(&old_value, new_value) {
            diff.insert(
                key.clone(),
                FieldChange {
                    old: old_value,
                    new: new_value.clone(),
                },
            );
        }
    }

    diff
}

/// Apply a diff onto `state`, overwriting each changed field with its new
/// value. Fields never present in any diff are left untouched; nothing is
/// ever removed.
pub fn apply_diff(state: &mut FieldMap, diff: &Diff) {
    for (field, change) in diff {
        state.insert(field.clone(), change.new.clone());
    }
}
