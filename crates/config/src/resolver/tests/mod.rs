//! Tests for the settings resolver.
//!
//! Responsibilities:
//! - Test environment selection, layering and compound keys.
//! - Test loading every supported source format from disk.
//! - Test env directories, placeholders, indirection and direct overrides.
//!
//! Does NOT handle:
//! - Parser edge cases (tested next to each parser in `source/`).
//! - Merge primitives (tested in merge.rs).
//!
//! Invariants:
//! - Fixture files are written into `tempfile` directories and cleaned up automatically.
//! - Tests touching the process environment or cwd hold `env_lock()`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub mod compound_tests;

/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// Write `content` to `dir/name` and return the full path.
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    path
}
