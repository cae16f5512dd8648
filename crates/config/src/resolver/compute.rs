//! Computation of the resolved globals.
//!
//! Responsibilities:
//! - Merge the settings layers that match the active environment set.
//! - Apply direct overrides, `&key` indirections and placeholder substitution.
//!
//! Does NOT handle:
//! - Caching or invalidation (see `Resolver::globals`).
//!
//! Invariants / Assumptions:
//! - Compound keys apply only when every named environment is active, and
//!   before single environments; single environments then override them.
//! - Single environments merge recursively in activation order (later wins).
//! - The result depends only on the inputs: recomputing yields identical globals.

use crate::constants::{COMPOUND_SEPARATOR, INDIRECT_PREFIX};
use crate::merge::{deep_merge_into, merge_additive};
use crate::placeholder::substitute_all;
use crate::value::{Mapping, Value};

use super::ResolverOptions;

/// Returns the constituent environments of a compound key, or `None` for
/// plain keys.
pub(crate) fn compound_parts(key: &str) -> Option<Vec<&str>> {
    key.contains(COMPOUND_SEPARATOR)
        .then(|| key.split(COMPOUND_SEPARATOR).map(str::trim).collect())
}

pub(super) fn resolve_globals(
    settings: &Mapping,
    active: &[String],
    overrides: &Mapping,
    options: &ResolverOptions,
) -> Mapping {
    let mut globals = Mapping::new();

    for (key, value) in settings {
        let Some(parts) = compound_parts(key) else {
            continue;
        };
        if !parts.iter().all(|part| active.iter().any(|a| a == part)) {
            continue;
        }
        match value {
            Value::Mapping(layer) => merge_additive(&mut globals, layer.clone()),
            _ => tracing::debug!(key = %key, "Compound settings key is not a mapping, skipping"),
        }
    }

    for name in active {
        match settings.get(name) {
            Some(Value::Mapping(layer)) => deep_merge_into(&mut globals, layer.clone()),
            Some(_) => {
                tracing::debug!(environment = %name, "Environment settings are not a mapping, skipping")
            }
            None => {}
        }
    }

    deep_merge_into(&mut globals, overrides.clone());

    let mut path = Vec::new();
    for (key, value) in globals.iter_mut() {
        path.push(key.clone());
        resolve_indirect(value, settings, &mut path);
        path.pop();
    }

    let report = substitute_all(&mut globals, options.unresolved);
    tracing::debug!(
        environments = ?active,
        keys = globals.len(),
        passes = report.passes,
        "Resolved settings"
    );
    globals
}

/// Replace `"&other"` strings with the value found at the same path under
/// `settings[other]`. Unknown targets are left untouched.
fn resolve_indirect(value: &mut Value, settings: &Mapping, path: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            let Some(target_key) = s.strip_prefix(INDIRECT_PREFIX) else {
                return;
            };
            let Some(mut target) = settings.get(target_key) else {
                return;
            };
            for segment in path.iter() {
                match target.get(segment) {
                    Some(next) => target = next,
                    None => return,
                }
            }
            *value = target.clone();
        }
        Value::Mapping(map) => {
            for (key, child) in map.iter_mut() {
                path.push(key.clone());
                resolve_indirect(child, settings, path);
                path.pop();
            }
        }
        Value::List(items) => {
            for item in items.iter_mut() {
                resolve_indirect(item, settings, path);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(value: serde_json::Value) -> Mapping {
        match Value::from(value) {
            Value::Mapping(map) => map,
            other => panic!("expected mapping, got {other:?}"),
        }
    }

    fn active(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_compound_parts() {
        assert_eq!(compound_parts("a+b+c"), Some(vec!["a", "b", "c"]));
        assert_eq!(compound_parts("prod"), None);
    }

    #[test]
    fn test_later_environment_wins() {
        let settings = mapping(json!({
            "": {"foo": "bar", "bar": 1, "keep": true},
            "prod": {"foo": "baz", "bar": 2},
        }));
        let globals = resolve_globals(
            &settings,
            &active(&["", "prod"]),
            &Mapping::new(),
            &ResolverOptions::default(),
        );

        assert_eq!(globals.get("foo"), Some(&Value::String("baz".into())));
        assert_eq!(globals.get("bar"), Some(&Value::Integer(2)));
        assert_eq!(globals.get("keep"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_compound_requires_all_parts() {
        let settings = mapping(json!({
            "a": {"x": 1},
            "a+b": {"both": true},
        }));
        let only_a = resolve_globals(
            &settings,
            &active(&["a"]),
            &Mapping::new(),
            &ResolverOptions::default(),
        );
        assert!(!only_a.contains_key("both"));

        let both = resolve_globals(
            &settings,
            &active(&["a", "b"]),
            &Mapping::new(),
            &ResolverOptions::default(),
        );
        assert_eq!(both.get("both"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_single_environment_overrides_compound() {
        let settings = mapping(json!({
            "a+b": {"foo": "compound", "only": 1},
            "b": {"foo": "single"},
        }));
        let globals = resolve_globals(
            &settings,
            &active(&["a", "b"]),
            &Mapping::new(),
            &ResolverOptions::default(),
        );
        assert_eq!(globals.get("foo"), Some(&Value::String("single".into())));
        assert_eq!(globals.get("only"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_indirect_lookup_uses_field_name() {
        let settings = mapping(json!({
            "shared": {"db": {"host": "db.internal"}, "token": "s3cr3t"},
            "prod": {"token": "&shared", "db": {"host": "&shared"}, "other": "&missing"},
        }));
        let globals = resolve_globals(
            &settings,
            &active(&["prod"]),
            &Mapping::new(),
            &ResolverOptions::default(),
        );
        let root = Value::Mapping(globals);

        assert_eq!(root.get("token"), Some(&Value::String("s3cr3t".into())));
        assert_eq!(root.get_path("db.host"), Some(&Value::String("db.internal".into())));
        assert_eq!(root.get("other"), Some(&Value::String("&missing".into())));
    }

    #[test]
    fn test_overrides_apply_before_placeholders() {
        let settings = mapping(json!({"": {"url": "http://<% host %>"}}));
        let overrides = mapping(json!({"host": "example.com"}));
        let globals = resolve_globals(
            &settings,
            &active(&[""]),
            &overrides,
            &ResolverOptions::default(),
        );
        assert_eq!(
            globals.get("url"),
            Some(&Value::String("http://example.com".into()))
        );
    }
}
