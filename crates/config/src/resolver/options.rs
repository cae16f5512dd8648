//! Resolver options.
//!
//! Responsibilities:
//! - Carry the knobs that change how sources are expanded and placeholders resolved.
//!
//! Invariants:
//! - Defaults expand keys of every source on `_` and `.`; unresolved
//!   placeholders are kept verbatim.

use crate::constants::DEFAULT_KEY_SEPARATORS;
use crate::expand::{KeyExpander, KeyExpansion};
use crate::placeholder::UnresolvedPlaceholder;

/// Options controlling key expansion and placeholder resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Which sources get their keys expanded into nested mappings.
    pub key_expansion: KeyExpansion,
    /// Characters that separate nesting levels in flat keys.
    pub separators: Vec<char>,
    /// Treatment of placeholders whose key does not resolve.
    pub unresolved: UnresolvedPlaceholder,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            key_expansion: KeyExpansion::default(),
            separators: DEFAULT_KEY_SEPARATORS.to_vec(),
            unresolved: UnresolvedPlaceholder::default(),
        }
    }
}

impl ResolverOptions {
    pub(crate) fn expander(&self) -> KeyExpander {
        KeyExpander::new(&self.separators)
    }
}
