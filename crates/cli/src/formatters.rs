//! Output formatting for resolved settings.
//!
//! Responsibilities:
//! - Parse the `--output` format name.
//! - Render settings values as JSON, YAML or env-style `KEY=value` lines.
//!
//! Does NOT handle:
//! - Choosing what to print (see `commands`).

use anyhow::{Context, Result};
use envy_config::{Mapping, Value};

use crate::error::InvalidArgument;

/// Output format for settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Env,
}

impl OutputFormat {
    /// Parse from string.
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "env" | "dotenv" => Ok(OutputFormat::Env),
            _ => Err(InvalidArgument(format!(
                "Invalid output format: {}. Valid options: json, yaml, env",
                s
            ))
            .into()),
        }
    }

    /// Render a settings value.
    pub fn render(self, value: &Value) -> Result<String> {
        match self {
            OutputFormat::Json => {
                serde_json::to_string_pretty(value).context("Failed to render JSON output")
            }
            OutputFormat::Yaml => {
                let yaml = serde_yaml::to_string(value).context("Failed to render YAML output")?;
                Ok(yaml.trim_end().to_string())
            }
            OutputFormat::Env => Ok(match value {
                Value::Mapping(map) => render_env(map),
                other => other.to_string(),
            }),
        }
    }

    /// Render a mapping of settings.
    pub fn render_mapping(self, mapping: &Mapping) -> Result<String> {
        match self {
            OutputFormat::Env => Ok(render_env(mapping)),
            _ => self.render(&Value::Mapping(mapping.clone())),
        }
    }
}

/// Flatten nested settings into `PARENT_CHILD=value` lines.
fn render_env(mapping: &Mapping) -> String {
    let mut lines = Vec::new();
    collect_env_lines(mapping, "", &mut lines);
    lines.join("\n")
}

fn collect_env_lines(mapping: &Mapping, prefix: &str, lines: &mut Vec<String>) {
    for (key, value) in mapping {
        let name = if prefix.is_empty() {
            key.to_uppercase()
        } else {
            format!("{prefix}_{}", key.to_uppercase())
        };
        match value {
            Value::Mapping(nested) if !nested.is_empty() => collect_env_lines(nested, &name, lines),
            other => lines.push(format!("{name}={}", env_quote(&other.to_string()))),
        }
    }
}

/// Single-quote values that a `.env` parser would otherwise split or expand.
fn env_quote(raw: &str) -> String {
    let needs_quotes = raw
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '#' | '$' | '\\' | '\''));
    if needs_quotes && !raw.contains('\'') {
        format!("'{raw}'")
    } else {
        raw.to_string()
    }
}
