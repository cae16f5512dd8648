//! Merge policies for settings layers.
//!
//! Three policies are used by the resolver:
//! - `deep_merge`: mappings merge key by key, recursively
//! - `merge_shallow`: top-level keys only, later wins
//! - `merge_additive`: top-level keys only, earlier wins
//!
//! Keys already in `base` keep their position; new keys are appended.
//! In all of them, lists REPLACE (no concatenation) and scalars override. Null
//! overrides any value.

use crate::value::{Mapping, Value};

/// Deep merge two values.
///
/// Merge semantics:
/// - Mapping + Mapping: deep-merge by key (recursive)
/// - Any other combination: overlay wins
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(mut base_map), Value::Mapping(overlay_map)) => {
            deep_merge_into(&mut base_map, overlay_map);
            Value::Mapping(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Deep merge `overlay` into `base` in place.
pub fn deep_merge_into(base: &mut Mapping, overlay: Mapping) {
    for (key, overlay_value) in overlay {
        match base.get_mut(&key) {
            Some(slot) => {
                let base_value = std::mem::take(slot);
                *slot = deep_merge(base_value, overlay_value);
            }
            None => {
                base.insert(key, overlay_value);
            }
        }
    }
}

/// Merge the top-level keys of `overlay` into `base`; overlay values replace
/// base values wholesale.
pub fn merge_shallow(base: &mut Mapping, overlay: Mapping) {
    base.extend(overlay);
}

/// Add the top-level keys of `overlay` that `base` does not have yet.
pub fn merge_additive(base: &mut Mapping, overlay: Mapping) {
    for (key, value) in overlay {
        base.entry(key).or_insert(value);
    }
}

/// Merge multiple layers in order (first is base, last has highest precedence).
pub fn merge_layers(layers: Vec<Mapping>) -> Mapping {
    layers.into_iter().fold(Mapping::new(), |mut acc, layer| {
        deep_merge_into(&mut acc, layer);
        acc
    })
}
