//! Property-based tests for settings resolution.
//!
//! These tests verify resolution rules over randomly generated settings,
//! catching edge cases that hand-written fixtures miss.
//!
//! Test coverage:
//! - Layering: later environments win per key, earlier keys survive.
//! - Key expansion: flat `a_b_c` keys are reachable at `a.b.c`.
//! - Placeholders: arbitrary reference graphs (including cycles) terminate.
//! - Selection: duplicates collapse onto their first position.

use std::collections::BTreeMap;

use proptest::prelude::*;

use envy_config::{KeyExpander, Mapping, MemorySource, Resolver, Selection, Value, lookup_path};

/// Strategy for setting names that contain no separators.
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,7}".prop_map(String::from)
}

/// Strategy for scalar setting values.
fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        "[a-zA-Z0-9 ._-]{0,16}".prop_map(Value::String),
    ]
}

/// Strategy for a flat environment layer.
fn layer_strategy() -> impl Strategy<Value = BTreeMap<String, Value>> {
    prop::collection::btree_map(key_strategy(), scalar_strategy(), 0..12)
}

fn build(root: Mapping, environments: Vec<&str>) -> Resolver {
    Resolver::builder()
        .source_with(MemorySource::new(root))
        .environments(environments)
        .build()
        .expect("in-memory settings always build")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Later environments win per key; keys only set earlier survive.
    #[test]
    fn test_later_environment_wins(base in layer_strategy(), overlay in layer_strategy()) {
        let mut root = Mapping::new();
        root.insert(String::new(), Value::Mapping(base.clone().into_iter().collect()));
        root.insert("prod".to_string(), Value::Mapping(overlay.clone().into_iter().collect()));

        let resolver = build(root, vec!["", "prod"]);

        for (key, value) in &base {
            if !overlay.contains_key(key) {
                prop_assert_eq!(&resolver.get(key), value);
            }
        }
        for (key, value) in &overlay {
            prop_assert_eq!(&resolver.get(key), value);
        }
        prop_assert_eq!(resolver.globals().len(), base.keys().chain(overlay.keys()).collect::<std::collections::BTreeSet<_>>().len());
    }

    /// Repeated reads without mutation return identical results.
    #[test]
    fn test_reads_are_stable(base in layer_strategy()) {
        let mut root = Mapping::new();
        root.insert(String::new(), Value::Mapping(base.into_iter().collect()));
        let resolver = build(root, vec![""]);

        let first = resolver.globals().clone();
        prop_assert_eq!(&first, resolver.globals());
    }

    /// Flat keys expand into nested mappings reachable by dotted path.
    #[test]
    fn test_expanded_keys_reachable_by_path(
        segments in prop::collection::vec(key_strategy(), 1..4),
        value in scalar_strategy(),
    ) {
        let flat_key = segments.join("_");
        let expanded = KeyExpander::default().expand(vec![(flat_key, value.clone())]);

        prop_assert_eq!(lookup_path(&expanded, &segments.join(".")), Some(&value));
    }

    /// Arbitrary placeholder graphs terminate and keep every key.
    #[test]
    fn test_placeholder_graphs_terminate(
        refs in prop::collection::btree_map(key_strategy(), prop::collection::vec(key_strategy(), 0..3), 1..8),
    ) {
        let layer: Mapping = refs
            .iter()
            .map(|(key, targets)| {
                let text = targets
                    .iter()
                    .map(|target| format!("<% {target} %>"))
                    .collect::<Vec<_>>()
                    .join("-");
                (key.clone(), Value::String(format!("x{text}")))
            })
            .collect();
        let mut root = Mapping::new();
        root.insert(String::new(), Value::Mapping(layer));

        let resolver = build(root, vec![""]);

        prop_assert_eq!(resolver.globals().len(), refs.len());
        for key in refs.keys() {
            prop_assert!(resolver.has(key));
        }
    }

    /// Selections keep the first position of every name.
    #[test]
    fn test_selection_dedup_keeps_first(names in prop::collection::vec("[a-c]{0,1}", 0..10)) {
        let selection = Selection::new(names.clone());

        let mut expected: Vec<String> = Vec::new();
        for name in names {
            if !expected.contains(&name) {
                expected.push(name);
            }
        }
        prop_assert_eq!(selection.names(), expected.as_slice());
    }
}
