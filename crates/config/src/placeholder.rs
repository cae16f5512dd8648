//! `<% key %>` placeholder substitution.
//!
//! Responsibilities:
//! - Replace placeholder tokens in string values with other resolved settings.
//! - Iterate to a fixed point, bounded by `MAX_PLACEHOLDER_PASSES`.
//!
//! Does NOT handle:
//! - Environment variable expansion (env files are expanded by `dotenvy`).
//! - Reporting cycles as errors: non-convergence only logs a warning.
//!
//! Invariants:
//! - A string that is exactly one token takes the referenced value with its type.
//! - Embedded tokens take the scalar rendering of the referenced value; references
//!   to lists or mappings inside a longer string count as unresolved.
//! - Keys may be dotted paths into nested settings.

use crate::constants::{MAX_PLACEHOLDER_PASSES, PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN};
use crate::value::{Mapping, Value, lookup_path};

/// What to do with a token whose key cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnresolvedPlaceholder {
    /// Leave the token in place.
    #[default]
    Keep,
    /// Replace the token with an empty string.
    Remove,
}

/// Outcome of a substitution run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstitutionReport {
    /// Number of passes that were run.
    pub passes: usize,
    /// Whether the last pass changed nothing.
    pub converged: bool,
}

/// A placeholder token found inside a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token<'a> {
    start: usize,
    end: usize,
    key: &'a str,
}

/// Find the next valid token at or after `from`.
fn next_token(input: &str, from: usize) -> Option<Token<'_>> {
    let mut search = from;
    while let Some(offset) = input[search..].find(PLACEHOLDER_OPEN) {
        let start = search + offset;
        let body_start = start + PLACEHOLDER_OPEN.len();
        let close = input[body_start..].find(PLACEHOLDER_CLOSE)?;
        let end = body_start + close + PLACEHOLDER_CLOSE.len();
        let key = input[body_start..body_start + close].trim();
        if is_valid_key(key) {
            return Some(Token { start, end, key });
        }
        search = body_start;
    }
    None
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '+' | '-'))
}

/// Whether a string contains at least one placeholder token.
pub fn contains_placeholder(input: &str) -> bool {
    next_token(input, 0).is_some()
}

/// Substitute the tokens of a single string against `root`.
pub fn substitute_str(input: &str, root: &Mapping, policy: UnresolvedPlaceholder) -> Value {
    let Some(first) = next_token(input, 0) else {
        return Value::String(input.to_string());
    };

    if first.start == 0 && first.end == input.len() {
        return match lookup_path(root, first.key) {
            Some(value) => value.clone(),
            None => match policy {
                UnresolvedPlaceholder::Keep => Value::String(input.to_string()),
                UnresolvedPlaceholder::Remove => Value::String(String::new()),
            },
        };
    }

    let mut output = String::with_capacity(input.len());
    let mut cursor = 0;
    let mut token = Some(first);
    while let Some(current) = token {
        output.push_str(&input[cursor..current.start]);
        match lookup_path(root, current.key) {
            Some(value) if value.is_scalar() => output.push_str(&value.to_string()),
            _ => {
                if policy == UnresolvedPlaceholder::Keep {
                    output.push_str(&input[current.start..current.end]);
                }
            }
        }
        cursor = current.end;
        token = next_token(input, cursor);
    }
    output.push_str(&input[cursor..]);
    Value::String(output)
}

/// Substitute tokens inside `value`, setting `changed` when any string
/// is rewritten.
fn substitute_value(
    value: &Value,
    root: &Mapping,
    policy: UnresolvedPlaceholder,
    changed: &mut bool,
) -> Value {
    match value {
        Value::String(s) => {
            let result = substitute_str(s, root, policy);
            if !matches!(&result, Value::String(out) if out == s) {
                *changed = true;
            }
            result
        }
        Value::List(items) => Value::List(
            items
                .iter()
                .map(|item| substitute_value(item, root, policy, changed))
                .collect(),
        ),
        Value::Mapping(map) => Value::Mapping(
            map.iter()
                .map(|(k, v)| (k.clone(), substitute_value(v, root, policy, changed)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Substitute placeholders across `globals` until nothing changes or the
/// pass limit is reached.
///
/// Each pass resolves against a snapshot of the previous pass, so chains of
/// references resolve one link per pass.
pub fn substitute_all(globals: &mut Mapping, policy: UnresolvedPlaceholder) -> SubstitutionReport {
    substitute_all_bounded(globals, policy, MAX_PLACEHOLDER_PASSES)
}

pub(crate) fn substitute_all_bounded(
    globals: &mut Mapping,
    policy: UnresolvedPlaceholder,
    max_passes: usize,
) -> SubstitutionReport {
    for pass in 1..=max_passes {
        let mut changed = false;
        let next: Mapping = globals
            .iter()
            .map(|(k, v)| (k.clone(), substitute_value(v, globals, policy, &mut changed)))
            .collect();
        if !changed {
            return SubstitutionReport {
                passes: pass,
                converged: true,
            };
        }
        *globals = next;
    }

    tracing::warn!(
        passes = max_passes,
        "Placeholder substitution did not converge; keeping partially substituted values"
    );
    SubstitutionReport {
        passes: max_passes,
        converged: false,
    }
}
