//! Env-file (`KEY=value`) parsing.
//!
//! Responsibilities:
//! - Parse `.env`-style content with `dotenvy` without touching the process environment.
//! - Lower-case keys and decode values into typed scalars.
//!
//! Does NOT handle:
//! - Deciding which env files belong to which environment (see `resolver`).
//! - Key expansion (see `expand.rs`).
//!
//! Invariants:
//! - Pairs are returned in file order so later keys win during expansion.
//! - Errors carry only the byte index of a parse failure, never line contents.

use std::path::Path;

use super::Pairs;
use crate::error::ConfigError;
use crate::value::Value;

/// Parse env-file content into lower-cased, decoded pairs.
pub(crate) fn parse_env(content: &str, path: &Path) -> Result<Pairs, ConfigError> {
    let mut pairs = Pairs::new();
    for item in dotenvy::from_read_iter(content.as_bytes()) {
        let (key, value) = item.map_err(|e| map_dotenv_error(e, path))?;
        pairs.push((key.to_lowercase(), Value::decode_scalar(&value)));
    }
    Ok(pairs)
}

fn map_dotenv_error(error: dotenvy::Error, path: &Path) -> ConfigError {
    match error {
        dotenvy::Error::LineParse(_, idx) => ConfigError::DotenvParse {
            path: path.to_path_buf(),
            error_index: idx,
        },
        dotenvy::Error::Io(io_err) => ConfigError::SourceRead {
            path: path.to_path_buf(),
            source: io_err,
        },
        _ => ConfigError::SourceParse {
            path: path.to_path_buf(),
            format: super::SourceFormat::Env,
            message: "unrecognized env file error".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Pairs {
        parse_env(content, Path::new(".env")).expect("valid env content")
    }

    #[test]
    fn test_keys_are_lowercased_in_order() {
        let pairs = parse("FOO=bar\nBAR=1\n");
        assert_eq!(
            pairs,
            vec![
                ("foo".to_string(), Value::String("bar".into())),
                ("bar".to_string(), Value::Integer(1)),
            ]
        );
    }

    #[test]
    fn test_quoted_json_value_is_decoded() {
        let pairs = parse("JSON='{\"foo\":\"bar\"}'\n");
        let (_, value) = &pairs[0];
        assert_eq!(value.get("foo"), Some(&Value::String("bar".into())));
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let pairs = parse("# comment\n\nFOO=bar\n");
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].1, Value::String("bar".into()));
    }

    #[test]
    fn test_invalid_line_returns_parse_error_without_content() {
        let secret = "SUPER_SECRET_VALUE_123";
        let result = parse_env(&format!("NOT A VALID LINE {secret}"), Path::new(".env"));
        match result {
            Err(err @ ConfigError::DotenvParse { .. }) => {
                assert!(!err.to_string().contains(secret));
            }
            other => panic!("expected DotenvParse, got {other:?}"),
        }
    }
}
