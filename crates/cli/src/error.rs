//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map ConfigError variants to appropriate exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for specific error categories.

use envy_config::ConfigError;
use thiserror::Error;

/// Structured exit codes for envy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// No config source was given before environments were selected.
    ///
    /// Scripts should pass at least one `--source` or `--env-dir`.
    ConfigMissing = 2,

    /// A config source exists but could not be read or parsed.
    SourceError = 3,

    /// Setting not found.
    NotFound = 4,

    /// Validation error - bad arguments or unsupported source formats.
    ///
    /// Scripts should fix the input and not retry.
    ValidationError = 5,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(err: &ConfigError) -> Self {
        match err {
            ConfigError::ConfigMissing => ExitCode::ConfigMissing,
            ConfigError::NotFound(_) => ExitCode::NotFound,
            ConfigError::SourceRead { .. }
            | ConfigError::SourceParse { .. }
            | ConfigError::DotenvParse { .. } => ExitCode::SourceError,
            ConfigError::UnsupportedFormat { .. } => ExitCode::ValidationError,
            ConfigError::EnvironmentNotInitialized | ConfigError::Extract(_) => {
                ExitCode::GeneralError
            }
        }
    }
}

pub trait ExitCodeExt {
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
                return ExitCode::from(config_err);
            }
            if cause.downcast_ref::<InvalidArgument>().is_some() {
                return ExitCode::ValidationError;
            }
        }

        ExitCode::GeneralError
    }
}

/// An argument value that clap accepted but the command cannot use.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct InvalidArgument(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn test_exit_code_as_i32() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::NotFound.as_i32(), 4);
    }

    #[test]
    fn test_from_config_error() {
        assert_eq!(
            ExitCode::from(&ConfigError::ConfigMissing),
            ExitCode::ConfigMissing
        );
        assert_eq!(
            ExitCode::from(&ConfigError::NotFound("db".to_string())),
            ExitCode::NotFound
        );
        assert_eq!(
            ExitCode::from(&ConfigError::UnsupportedFormat {
                path: PathBuf::from("settings.conf")
            }),
            ExitCode::ValidationError
        );
    }

    #[test]
    fn test_exit_code_found_through_context() {
        let err = Err::<(), _>(ConfigError::NotFound("db".to_string()))
            .context("Failed to read setting")
            .unwrap_err();
        assert_eq!(err.exit_code(), ExitCode::NotFound);
    }

    #[test]
    fn test_invalid_argument_is_validation_error() {
        let err = anyhow::Error::new(InvalidArgument("bad".to_string()));
        assert_eq!(err.exit_code(), ExitCode::ValidationError);
    }

    #[test]
    fn test_unknown_error_is_general() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(err.exit_code(), ExitCode::GeneralError);
    }
}
