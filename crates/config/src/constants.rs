//! Centralized constants for the Envy workspace.
//!
//! This module contains the fixed tokens and limits shared by the resolver,
//! the source parsers and the CLI.

// =============================================================================
// Environment Keys
// =============================================================================

/// Separator joining environment names inside a compound settings key (`"a+b"`).
pub const COMPOUND_SEPARATOR: char = '+';

/// Token used by XML sources in place of [`COMPOUND_SEPARATOR`], since `+`
/// is not valid inside an element name.
pub const XML_AND_TOKEN: &str = "-AND-";

/// Prefix marking a value as an indirect lookup into another settings key.
pub const INDIRECT_PREFIX: char = '&';

/// Name of the default (base) environment.
pub const DEFAULT_ENVIRONMENT: &str = "";

// =============================================================================
// Placeholders
// =============================================================================

/// Opening delimiter of a placeholder token.
pub const PLACEHOLDER_OPEN: &str = "<%";

/// Closing delimiter of a placeholder token.
pub const PLACEHOLDER_CLOSE: &str = "%>";

/// Maximum number of substitution passes before giving up on convergence.
pub const MAX_PLACEHOLDER_PASSES: usize = 10;

// =============================================================================
// Files & Environment Variables
// =============================================================================

/// File name of the default environment's env file; other environments use
/// `.env.<name>`.
pub const ENV_FILE_PREFIX: &str = ".env";

/// Default separators used to nest keys (`foo_bar` and `foo.bar` -> `foo.bar`).
pub const DEFAULT_KEY_SEPARATORS: &[char] = &['_', '.'];

/// Process environment variable read by [`crate::selector::from_env_var`]
/// consumers that do not name their own.
pub const DEFAULT_ENV_VAR: &str = "ENVY_ENV";

/// Separator for environment lists carried in a single environment variable.
pub const ENV_LIST_SEPARATOR: char = ',';
