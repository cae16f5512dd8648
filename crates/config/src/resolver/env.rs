//! Process environment variable helpers.
//!
//! Responsibilities:
//! - Read environment variables with empty/whitespace filtering.
//! - Turn a comma-separated variable into an environment `Selection`.
//!
//! Does NOT handle:
//! - Loading `.env` files into the process environment (env files are parsed
//!   as sources, see `source/env.rs`).
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).

use super::selector::Selection;
use crate::constants::ENV_LIST_SEPARATOR;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            // No trimming needed, return original to avoid allocation
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parse a comma-separated environment list (`",prod"` selects the default
/// environment and `prod`).
pub fn parse_environment_list(raw: &str) -> Selection {
    Selection::new(raw.split(ENV_LIST_SEPARATOR).map(str::trim))
}

/// Read the active environments from a process environment variable.
pub fn environments_from_var(var: &str) -> Selection {
    env_var_or_none(var)
        .map(|raw| parse_environment_list(&raw))
        .unwrap_or_default()
}
