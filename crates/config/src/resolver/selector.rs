//! Environment selection.
//!
//! Responsibilities:
//! - Normalize a selector's result (one name or a list) into an ordered `Selection`.
//! - Provide ready-made selectors (fixed lists, process environment variable).
//!
//! Does NOT handle:
//! - Storing the active set or invalidating the cache (see `Resolver::set_environment`).
//!
//! Invariants:
//! - Selection order is activation order; duplicates keep their first position.
//! - `""` is a valid name: the default environment.

use super::Resolver;
use super::env::environments_from_var;

/// Ordered set of environment names chosen by a selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection(Vec<String>);

impl Selection {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        Self(unique)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_names(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for Selection {
    fn from(name: &str) -> Self {
        Selection::new([name])
    }
}

impl From<String> for Selection {
    fn from(name: String) -> Self {
        Selection::new([name])
    }
}

impl From<Vec<String>> for Selection {
    fn from(names: Vec<String>) -> Self {
        Selection::new(names)
    }
}

impl From<Vec<&str>> for Selection {
    fn from(names: Vec<&str>) -> Self {
        Selection::new(names)
    }
}

impl From<&[&str]> for Selection {
    fn from(names: &[&str]) -> Self {
        Selection::new(names.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Selection {
    fn from(names: [&str; N]) -> Self {
        Selection::new(names)
    }
}

/// A selector that always returns the same names.
pub fn fixed<S: Into<Selection>>(names: S) -> impl Fn(&Resolver) -> Selection + Send + Sync + 'static {
    let selection = names.into();
    move |_| selection.clone()
}

/// A selector reading a comma-separated list from a process environment variable.
///
/// The variable is read each time the selector runs. Unset, empty or
/// whitespace-only values select nothing.
pub fn from_env_var(var: impl Into<String>) -> impl Fn(&Resolver) -> Selection + Send + Sync + 'static {
    let var = var.into();
    move |_| environments_from_var(&var)
}
