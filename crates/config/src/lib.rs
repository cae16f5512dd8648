//! Environment-layered settings for Envy.
//!
//! Settings are loaded from config sources (env files, INI, JSON, YAML, TOML,
//! XML) into a mapping keyed by environment name. A selector chooses the
//! active environments; the resolver merges their layers, applies compound
//! (`a+b`) layers, `&other` indirections and `<% key %>` placeholders, and
//! serves the result through `get`/`has`/`set`.
//!
//! ```no_run
//! use envy_config::Resolver;
//!
//! # fn main() -> Result<(), envy_config::ConfigError> {
//! let resolver = Resolver::builder()
//!     .source("config/settings.yml")
//!     .env_dir("config")
//!     .environments_from_var("ENVY_ENV")
//!     .build()?;
//!
//! let host = resolver.get("db").get_path("host").cloned();
//! # let _ = host;
//! # Ok(())
//! # }
//! ```

pub mod constants;
mod error;
pub mod expand;
pub mod global;
pub mod merge;
pub mod placeholder;
mod resolver;
pub mod source;
mod value;

pub use error::ConfigError;
pub use expand::{KeyExpander, KeyExpansion};
pub use placeholder::UnresolvedPlaceholder;
pub use resolver::{
    Resolver, ResolverBuilder, ResolverOptions, Selection, env_file_environment, env_file_name,
    env_var_or_none, environments_from_var, parse_environment_list, selector,
};
pub use source::{FileSource, MemorySource, Source, SourceData, SourceFormat};
pub use value::{Mapping, Value, lookup_path};
