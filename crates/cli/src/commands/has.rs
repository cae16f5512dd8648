//! Has command implementation.

use anyhow::Result;
use envy_config::{ConfigError, Resolver};

/// Succeeds silently when `key` is a resolved setting, a dotted path into one,
/// or an active environment.
pub fn run(resolver: &Resolver, key: &str) -> Result<()> {
    if resolver.has(key) || resolver.get_path(key).is_some() {
        Ok(())
    } else {
        Err(ConfigError::NotFound(key.to_string()).into())
    }
}
