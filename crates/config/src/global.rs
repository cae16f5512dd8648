//! Process-wide resolver access.
//!
//! Responsibilities:
//! - Hold the most recently installed `Resolver` for code that cannot thread one through.
//!
//! Does NOT handle:
//! - Building resolvers (see `ResolverBuilder::build_global`).
//!
//! Invariants:
//! - Installing replaces the previous instance; readers holding the old `Arc` keep it.
//! - Reading before anything was installed fails with `EnvironmentNotInitialized`.

use std::sync::{Arc, PoisonError, RwLock};

use crate::error::ConfigError;
use crate::resolver::Resolver;

static INSTANCE: RwLock<Option<Arc<Resolver>>> = RwLock::new(None);

/// Install `resolver` as the process-wide instance and return a handle to it.
pub fn install(resolver: Resolver) -> Arc<Resolver> {
    let resolver = Arc::new(resolver);
    let mut slot = INSTANCE.write().unwrap_or_else(PoisonError::into_inner);
    if slot.replace(Arc::clone(&resolver)).is_some() {
        tracing::debug!("Replaced process-wide settings resolver");
    }
    resolver
}

/// The process-wide resolver.
///
/// # Errors
///
/// Returns `ConfigError::EnvironmentNotInitialized` if no resolver was installed.
pub fn instance() -> Result<Arc<Resolver>, ConfigError> {
    INSTANCE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .ok_or(ConfigError::EnvironmentNotInitialized)
}

/// Remove the process-wide resolver, returning it if one was installed.
pub fn reset() -> Option<Arc<Resolver>> {
    INSTANCE
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
}
