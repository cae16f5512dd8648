//! Shared test utilities for envy integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Write settings fixtures into temporary project directories.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper are hermetic by default.
//! - `ENVY_ENV` is cleared unless a test sets it.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Returns a hermetic `envy` command for integration testing.
///
/// It ensures:
/// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
/// - `ENVY_ENV` and `RUST_LOG` are cleared to ensure no leakage from the host.
pub fn envy_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("envy");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");

    cmd.env_remove("ENVY_ENV").env_remove("RUST_LOG");

    cmd
}

/// Write `content` to `dir/name` and return the full path.
#[allow(dead_code)]
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

/// A project directory with YAML settings and per-environment env files.
#[allow(dead_code)]
pub fn project() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_fixture(
        dir.path(),
        "settings.yml",
        r#"
"":
  name: envy
  url: "https://<% host %>/"
  host: localhost
prod:
  host: envy.example.com
prod+eu:
  region: eu-west-1
"#,
    );
    write_fixture(dir.path(), ".env", "DB_HOST=localhost\nDB_PORT=5432\n");
    write_fixture(dir.path(), ".env.prod", "DB_HOST=db.prod\n");
    dir
}
