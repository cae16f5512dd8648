//! Expansion of separator-joined keys into nested mappings.
//!
//! Responsibilities:
//! - Turn flat keys such as `some_nested_object_var` or `db.host` into nested mappings.
//! - Build the nested tree directly, without constructing nested resolvers.
//!
//! Does NOT handle:
//! - Key case normalization (flat source parsers lower-case keys, see `source/env.rs`).
//! - Merging whole layers (see `merge.rs`).
//!
//! Invariants:
//! - A key is only split where both sides of the separator are non-empty, so
//!   `_private` and `trailing_` stay verbatim.
//! - When a scalar and a nested family share a prefix, the later key in source
//!   order wins and a warning is logged.

use crate::constants::DEFAULT_KEY_SEPARATORS;
use crate::merge::deep_merge;
use crate::value::{Mapping, Value};

/// Which sources get their keys expanded.
///
/// Top-level keys of structured sources and INI section names name
/// environments and are never split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyExpansion {
    /// Every source, at every nesting level below the environment names.
    #[default]
    All,
    /// Only sources whose keys are flat by nature (`.env`, INI).
    FlatSources,
    /// Keys are kept verbatim.
    Never,
}

impl KeyExpansion {
    pub(crate) fn applies_to(self, flat_source: bool) -> bool {
        match self {
            KeyExpansion::FlatSources => flat_source,
            KeyExpansion::All => true,
            KeyExpansion::Never => false,
        }
    }
}

/// Builds nested mappings from separator-joined keys.
#[derive(Debug, Clone)]
pub struct KeyExpander {
    separators: Vec<char>,
}

impl Default for KeyExpander {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_SEPARATORS)
    }
}

impl KeyExpander {
    pub fn new(separators: &[char]) -> Self {
        Self {
            separators: separators.to_vec(),
        }
    }

    /// Expand a sequence of flat `(key, value)` pairs into a nested mapping.
    ///
    /// Pairs are applied in order.
    pub fn expand<I>(&self, pairs: I) -> Mapping
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut root = Mapping::new();
        for (key, value) in pairs {
            self.insert(&mut root, &key, value);
        }
        root
    }

    /// Expand keys at every level of an already nested mapping.
    pub fn expand_tree(&self, mapping: Mapping) -> Mapping {
        let mut root = Mapping::new();
        for (key, value) in mapping {
            let value = match value {
                Value::Mapping(inner) => Value::Mapping(self.expand_tree(inner)),
                other => other,
            };
            self.insert(&mut root, &key, value);
        }
        root
    }

    /// Insert `value` under `key`, creating intermediate mappings as needed.
    pub fn insert(&self, target: &mut Mapping, key: &str, value: Value) {
        match self.split(key) {
            Some((head, rest)) => {
                let slot = target
                    .entry(head.to_string())
                    .or_insert_with(|| Value::Mapping(Mapping::new()));
                if !slot.is_mapping() {
                    tracing::warn!(
                        key = %head,
                        "Nested key family replaces scalar value with the same prefix"
                    );
                    *slot = Value::Mapping(Mapping::new());
                }
                if let Some(nested) = slot.as_mapping_mut() {
                    self.insert(nested, rest, value);
                }
            }
            None => match target.get_mut(key) {
                Some(slot) => {
                    let existing = std::mem::take(slot);
                    *slot = match (existing.is_mapping(), value.is_mapping()) {
                        (true, true) => deep_merge(existing, value),
                        (true, false) => {
                            tracing::warn!(
                                key = %key,
                                "Scalar value replaces nested key family with the same prefix"
                            );
                            value
                        }
                        _ => value,
                    };
                }
                None => {
                    target.insert(key.to_string(), value);
                }
            },
        }
    }

    /// Split at the first separator that has non-empty text on both sides.
    fn split<'a>(&self, key: &'a str) -> Option<(&'a str, &'a str)> {
        key.char_indices()
            .filter(|(_, c)| self.separators.contains(c))
            .map(|(i, c)| (&key[..i], &key[i + c.len_utf8()..]))
            .find(|(head, rest)| !head.is_empty() && !rest.is_empty())
    }
}
