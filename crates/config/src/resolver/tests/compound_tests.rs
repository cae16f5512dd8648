//! Compound environment key tests.
//!
//! Responsibilities:
//! - Test that `a+b` layers apply only when every named environment is active.
//! - Test precedence between compound layers and single environments.
//! - Test the XML `-AND-` spelling of compound keys.

use tempfile::TempDir;

use super::write_fixture;
use crate::resolver::Resolver;
use crate::value::Value;

const SETTINGS_YAML: &str = r#"
"":
  foo: default
  db:
    host: localhost
    port: 5432
prod:
  foo: production
  db:
    host: db.prod
prod+debug:
  verbose: true
  foo: compound
  db:
    port: 6543
debug+test:
  only_debug_test: true
"#;

fn resolver_for(environments: &[&str]) -> (TempDir, Resolver) {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(dir.path(), "settings.yml", SETTINGS_YAML);
    let mut resolver = Resolver::new();
    let names: Vec<String> = environments.iter().map(|s| s.to_string()).collect();
    resolver
        .load_config(&path)
        .unwrap()
        .set_environment(move |_| names)
        .unwrap();
    (dir, resolver)
}

#[test]
fn test_compound_inactive_when_one_part_missing() {
    let (_dir, resolver) = resolver_for(&["", "prod"]);
    assert!(!resolver.has("verbose"));
    assert_eq!(resolver.get("foo"), Value::from("production"));
}

#[test]
fn test_compound_applies_when_all_parts_active() {
    let (_dir, resolver) = resolver_for(&["", "prod", "debug"]);
    assert_eq!(resolver.get("verbose"), Value::Bool(true));
    assert!(!resolver.has("only_debug_test"));
}

#[test]
fn test_single_environments_override_compound_layer() {
    let (_dir, resolver) = resolver_for(&["", "prod", "debug"]);

    assert_eq!(resolver.get("foo"), Value::from("production"));
    assert_eq!(
        resolver.get_path("db.host"),
        Some(&Value::from("db.prod"))
    );
    // The default layer sets a port, so the compound layer's port loses.
    assert_eq!(resolver.get_path("db.port"), Some(&Value::Integer(5432)));
}

#[test]
fn test_compound_parts_are_order_independent() {
    let (_dir, resolver) = resolver_for(&["debug", "prod"]);
    assert_eq!(resolver.get("verbose"), Value::Bool(true));
    assert_eq!(resolver.get_path("db.port"), Some(&Value::Integer(6543)));
}

#[test]
fn test_compound_name_is_not_an_environment() {
    let (_dir, resolver) = resolver_for(&["prod", "debug"]);
    assert!(!resolver.using_environment("prod+debug"));
    assert!(!resolver.has("prod+debug"));
}

#[test]
fn test_xml_and_token_names_compound_layer() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        dir.path(),
        "settings.xml",
        r#"<?xml version="1.0"?>
<settings>
  <prod>
    <foo>production</foo>
  </prod>
  <prod-AND-debug>
    <verbose>true</verbose>
  </prod-AND-debug>
</settings>"#,
    );

    let mut resolver = Resolver::new();
    resolver
        .load_config(&path)
        .unwrap()
        .set_environment(|_| vec!["prod", "debug"])
        .unwrap();

    assert!(resolver.settings().contains_key("prod+debug"));
    assert_eq!(resolver.get("verbose"), Value::Bool(true));
    assert_eq!(resolver.get("foo"), Value::from("production"));
}

#[test]
fn test_first_compound_in_file_order_wins() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        dir.path(),
        "settings.yml",
        r#"
b+c:
  foo: from_b_c
a+b:
  foo: from_a_b
  extra: true
"#,
    );

    let mut resolver = Resolver::new();
    resolver
        .load_config(&path)
        .unwrap()
        .set_environment(|_| vec!["a", "b", "c"])
        .unwrap();

    assert_eq!(resolver.get("foo"), Value::from("from_b_c"));
    assert_eq!(resolver.get("extra"), Value::Bool(true));
}
