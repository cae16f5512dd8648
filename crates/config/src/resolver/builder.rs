//! Resolver builder implementation.
//!
//! Responsibilities:
//! - Collect sources, env directories, options and a selector in call order.
//! - Build a `Resolver` (or install it as the process-wide resolver).
//!
//! Does NOT handle:
//! - Parsing (see `source`) or resolution (see `compute.rs`).
//!
//! Invariants / Assumptions:
//! - Sources are loaded in the order they were added; later sources win per top-level key.
//! - The selector runs once, after every source is loaded.
//! - `load_dotenv()` must be called explicitly to read `.env` into the process environment.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

use std::path::PathBuf;
use std::sync::Arc;

use super::selector::{self, Selection};
use super::{Resolver, ResolverOptions};
use crate::error::ConfigError;
use crate::expand::KeyExpansion;
use crate::placeholder::UnresolvedPlaceholder;
use crate::source::Source;

type BoxedSelector = Box<dyn FnOnce(&Resolver) -> Selection>;

enum Pending {
    File(PathBuf),
    Source(Box<dyn Source>),
    EnvDir(PathBuf),
}

/// Builder for [`Resolver`].
pub struct ResolverBuilder {
    pending: Vec<Pending>,
    selector: Option<BoxedSelector>,
    options: ResolverOptions,
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolverBuilder {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            selector: None,
            options: ResolverOptions::default(),
        }
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load variables from a `.env` file in the working directory into the
    /// process environment, so environment-variable selectors can see them.
    ///
    /// If `DOTENV_DISABLED` is set to "true" or "1" nothing is loaded.
    /// A missing `.env` file is silently ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the `.env` file exists but cannot be read or parsed.
    /// Error messages never include raw line contents.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        let path = PathBuf::from(crate::constants::ENV_FILE_PREFIX);
        match dotenvy::dotenv() {
            Ok(loaded) => {
                tracing::debug!(path = %loaded.display(), "Loaded .env into process environment");
                Ok(self)
            }
            Err(e) if e.not_found() => Ok(self),
            Err(dotenvy::Error::LineParse(_, error_index)) => {
                Err(ConfigError::DotenvParse { path, error_index })
            }
            Err(dotenvy::Error::Io(source)) => Err(ConfigError::SourceRead { path, source }),
            Err(e) => Err(ConfigError::SourceParse {
                path,
                format: crate::source::SourceFormat::Env,
                message: e.to_string(),
            }),
        }
    }

    /// Add a config file, loaded with [`Resolver::load_config`]. Missing
    /// files are ignored at build time.
    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.pending.push(Pending::File(path.into()));
        self
    }

    /// Add any [`Source`] implementation.
    pub fn source_with(mut self, source: impl Source + 'static) -> Self {
        self.pending.push(Pending::Source(Box::new(source)));
        self
    }

    /// Add a directory of per-environment env files (`.env`, `.env.<name>`).
    pub fn env_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.pending.push(Pending::EnvDir(dir.into()));
        self
    }

    /// Set the environment selector, run once after all sources are loaded.
    pub fn selector<F, R>(mut self, selector: F) -> Self
    where
        F: FnOnce(&Resolver) -> R + 'static,
        R: Into<Selection>,
    {
        self.selector = Some(Box::new(move |resolver: &Resolver| selector(resolver).into()));
        self
    }

    /// Select a fixed list of environments.
    pub fn environments(self, names: impl Into<Selection>) -> Self {
        self.selector(selector::fixed(names))
    }

    /// Select environments from a comma-separated process environment variable.
    pub fn environments_from_var(self, var: impl Into<String>) -> Self {
        self.selector(selector::from_env_var(var))
    }

    pub fn options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn key_expansion(mut self, expansion: KeyExpansion) -> Self {
        self.options.key_expansion = expansion;
        self
    }

    pub fn separators(mut self, separators: &[char]) -> Self {
        self.options.separators = separators.to_vec();
        self
    }

    pub fn unresolved(mut self, policy: UnresolvedPlaceholder) -> Self {
        self.options.unresolved = policy;
        self
    }

    /// Load every source and run the selector.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigMissing` if a selector is set but no source
    /// or env directory was added, or any source loading error.
    pub fn build(self) -> Result<Resolver, ConfigError> {
        let mut resolver = Resolver::with_options(self.options);

        for pending in self.pending {
            match pending {
                Pending::File(path) => {
                    resolver.load_config(path)?;
                }
                Pending::Source(source) => {
                    resolver.load_source(source.as_ref())?;
                }
                Pending::EnvDir(dir) => {
                    resolver.load_env_dir(dir)?;
                }
            }
        }

        if let Some(selector) = self.selector {
            resolver.set_environment(selector)?;
        }

        Ok(resolver)
    }

    /// Build the resolver and install it as the process-wide instance.
    pub fn build_global(self) -> Result<Arc<Resolver>, ConfigError> {
        let resolver = self.build()?;
        Ok(crate::global::install(resolver))
    }
}
