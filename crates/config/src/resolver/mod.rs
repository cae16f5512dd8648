//! Settings resolver: environment-layered settings with lazy resolution.
//!
//! Responsibilities:
//! - Load config sources into raw settings keyed by environment name.
//! - Track the active environment set chosen by a selector.
//! - Lazily compute and cache the resolved globals (see `compute.rs`).
//! - Expose `get`/`try_get`/`get_path`/`has`/`set` over the resolved globals.
//!
//! Does NOT handle:
//! - Parsing file formats (see `source`).
//! - Process-wide access (see `global.rs`).
//!
//! Invariants / Assumptions:
//! - Missing config files are silently ignored but still count as configured sources.
//! - Env files feed the environment their file name names, whether passed as a
//!   source or found in an env directory.
//! - Selecting environments before any source was configured fails with `ConfigMissing`.
//! - The cache is cleared by every mutation and rebuilt on the next read;
//!   reads in between return identical results.
//! - Direct overrides survive recomputation until the active environment set changes.

mod builder;
mod compute;
mod env;
mod options;
pub mod selector;

#[cfg(test)]
mod tests;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::de::DeserializeOwned;

use crate::constants::{DEFAULT_ENVIRONMENT, ENV_FILE_PREFIX};
use crate::error::ConfigError;
use crate::merge::{deep_merge_into, merge_shallow};
use crate::source::{FileSource, Source, SourceData, SourceFormat, load_file};
use crate::value::{Mapping, Value, lookup_path};

pub use builder::ResolverBuilder;
pub use env::{env_var_or_none, environments_from_var, parse_environment_list};
pub use options::ResolverOptions;
pub use selector::Selection;

/// A directory of per-environment env files (`.env`, `.env.<name>`).
#[derive(Debug, Clone)]
struct EnvDir {
    path: PathBuf,
    loaded: BTreeSet<String>,
}

/// Environment-layered settings resolver.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    settings: Mapping,
    active: Vec<String>,
    overrides: Mapping,
    options: ResolverOptions,
    env_dirs: Vec<EnvDir>,
    sources_configured: usize,
    globals: OnceLock<Mapping>,
}

/// File name of the env file for `environment` (`.env` for the default environment).
pub fn env_file_name(environment: &str) -> String {
    if environment.is_empty() {
        ENV_FILE_PREFIX.to_string()
    } else {
        format!("{ENV_FILE_PREFIX}.{environment}")
    }
}

/// Environment whose layer an env file feeds, judged by its file name.
///
/// `.env.<name>` feeds `<name>`; `.env` and any other env-format file feed the
/// default environment. Returns `None` for files that are not env files.
pub fn env_file_environment(path: &Path) -> Option<String> {
    if SourceFormat::from_path(path) != Some(SourceFormat::Env) {
        return None;
    }
    let file_name = path.file_name()?.to_str()?;
    let name = file_name
        .strip_prefix(ENV_FILE_PREFIX)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(DEFAULT_ENVIRONMENT);
    Some(name.to_string())
}

/// Deep-merge `layer` into the settings of `environment`.
fn merge_environment_layer(settings: &mut Mapping, environment: &str, layer: Mapping) {
    match settings.get_mut(environment).and_then(Value::as_mapping_mut) {
        Some(existing) => deep_merge_into(existing, layer),
        None => {
            settings.insert(environment.to_string(), Value::Mapping(layer));
        }
    }
}

impl Resolver {
    /// Create an empty resolver with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty resolver with the given options.
    pub fn with_options(options: ResolverOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Start building a resolver.
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Load a config file and merge its top-level keys into the settings
    /// (later wins, no recursion).
    ///
    /// Env files hold a single environment's settings: they are merged into
    /// the environment their file name names (see [`env_file_environment`]).
    /// A missing file is silently ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the format is unsupported, or the file exists but
    /// cannot be read or parsed.
    pub fn load_config(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, ConfigError> {
        let path = path.as_ref();
        match env_file_environment(path) {
            Some(environment) => self.load_env_file(path, &environment),
            None => self.load_source(&FileSource::new(path)),
        }
    }

    fn load_env_file(&mut self, path: &Path, environment: &str) -> Result<&mut Self, ConfigError> {
        self.sources_configured += 1;
        match load_file(path)? {
            Some(data) => {
                let layer = self.expand_source(data);
                tracing::debug!(path = %path.display(), environment = %environment, "Loaded env file");
                merge_environment_layer(&mut self.settings, environment, layer);
                self.invalidate();
            }
            None => {
                tracing::debug!(path = %path.display(), "Env file absent, skipping");
            }
        }
        Ok(self)
    }

    fn expand_source(&self, data: SourceData) -> Mapping {
        data.into_mapping(self.options.key_expansion, &self.options.expander())
    }

    /// Load any [`Source`] and merge its top-level keys into the settings.
    pub fn load_source(&mut self, source: &dyn Source) -> Result<&mut Self, ConfigError> {
        self.sources_configured += 1;
        match source.load()? {
            Some(data) => {
                let mapping = self.expand_source(data);
                tracing::debug!(source = %source.describe(), keys = mapping.len(), "Loaded config source");
                merge_shallow(&mut self.settings, mapping);
                self.invalidate();
            }
            None => {
                tracing::debug!(source = %source.describe(), "Config source absent, skipping");
            }
        }
        Ok(self)
    }

    /// Register a directory of per-environment env files.
    ///
    /// The env file of every active environment is loaded into the settings
    /// under that environment's name; environments activated later are
    /// loaded when they are selected. Missing files are silently ignored.
    pub fn load_env_dir(&mut self, dir: impl Into<PathBuf>) -> Result<&mut Self, ConfigError> {
        self.sources_configured += 1;
        self.env_dirs.push(EnvDir {
            path: dir.into(),
            loaded: BTreeSet::new(),
        });
        let active = self.active.clone();
        self.load_pending_env_files(&active)?;
        Ok(self)
    }

    /// Load the env files of `environments` not loaded yet from every
    /// registered directory.
    ///
    /// Either every pending file is merged or, on error, nothing is: a file
    /// that failed stays pending and is retried on the next selection.
    fn load_pending_env_files(&mut self, environments: &[String]) -> Result<(), ConfigError> {
        let mut pending = Vec::new();
        for (index, dir) in self.env_dirs.iter().enumerate() {
            for name in environments {
                if dir.loaded.contains(name) {
                    continue;
                }
                let path = dir.path.join(env_file_name(name));
                let data = load_file(&path)?;
                pending.push((index, name.clone(), path, data));
            }
        }

        let mut changed = false;
        for (index, name, path, data) in pending {
            self.env_dirs[index].loaded.insert(name.clone());
            let Some(data) = data else {
                continue;
            };
            let layer = self.expand_source(data);
            tracing::debug!(path = %path.display(), environment = %name, "Loaded env file");
            merge_environment_layer(&mut self.settings, &name, layer);
            changed = true;
        }

        if changed {
            self.invalidate();
        }
        Ok(())
    }

    /// Run `selector` and make its result the active environment set.
    ///
    /// A single name becomes a one-element list. Direct overrides made with
    /// [`Resolver::set`] are discarded.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigMissing` if no config source has been
    /// configured yet, or any error from loading pending env files. On error
    /// the previous selection and overrides stay in effect.
    pub fn set_environment<F, R>(&mut self, selector: F) -> Result<&mut Self, ConfigError>
    where
        F: FnOnce(&Resolver) -> R,
        R: Into<Selection>,
    {
        if self.sources_configured == 0 {
            return Err(ConfigError::ConfigMissing);
        }

        let selection: Selection = selector(self).into();
        let names = selection.into_names();
        self.load_pending_env_files(&names)?;

        self.active = names;
        self.overrides.clear();
        self.invalidate();
        tracing::debug!(environments = ?self.active, "Selected environments");
        Ok(self)
    }

    /// The active environments in activation order.
    pub fn environments(&self) -> &[String] {
        &self.active
    }

    /// True iff `name` is an active environment.
    pub fn using_environment(&self, name: &str) -> bool {
        self.active.iter().any(|active| active == name)
    }

    /// The raw settings as loaded, before environment resolution.
    pub fn settings(&self) -> &Mapping {
        &self.settings
    }

    /// The resolved globals, computed on first access after a mutation.
    pub fn globals(&self) -> &Mapping {
        self.globals.get_or_init(|| {
            compute::resolve_globals(&self.settings, &self.active, &self.overrides, &self.options)
        })
    }

    /// Returns the resolved setting `name`, `Bool(true)` if `name` is an
    /// active environment, else `Value::Null`.
    pub fn get(&self, name: &str) -> Value {
        match self.globals().get(name) {
            Some(value) => value.clone(),
            None if self.using_environment(name) => Value::Bool(true),
            None => Value::Null,
        }
    }

    /// Like [`Resolver::get`], but reports unknown names as an error.
    pub fn try_get(&self, name: &str) -> Result<Value, ConfigError> {
        if self.has(name) {
            Ok(self.get(name))
        } else {
            Err(ConfigError::NotFound(name.to_string()))
        }
    }

    /// Look up a nested resolved setting by dotted path (`"some.nested.var"`).
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        lookup_path(self.globals(), path)
    }

    /// True if `name` is an active environment or a resolved setting.
    pub fn has(&self, name: &str) -> bool {
        self.using_environment(name) || self.globals().contains_key(name)
    }

    /// Override a setting directly.
    ///
    /// The override is merged on top of the environment layers on every
    /// recompute, until the active environment set changes.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.overrides.insert(name.into(), value.into());
        self.invalidate();
        self
    }

    /// Deserialize the resolved globals into a typed structure.
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        let json = serde_json::to_value(self.globals())?;
        Ok(serde_json::from_value(json)?)
    }

    fn invalidate(&mut self) {
        self.globals.take();
    }
}
