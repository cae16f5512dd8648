//! Get command implementation.
//!
//! Scalars print as plain text so the output can be used directly in shell
//! substitutions; lists and mappings use the selected output format.

use anyhow::{Context, Result};
use envy_config::{ConfigError, Resolver, Value};

use crate::formatters::OutputFormat;

pub fn run(resolver: &Resolver, output_format: &str, key: &str) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;

    let value = if resolver.has(key) {
        resolver.get(key)
    } else {
        resolver
            .get_path(key)
            .cloned()
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))
            .with_context(|| format!("Failed to read setting '{key}'"))?
    };

    let output = match &value {
        Value::List(_) | Value::Mapping(_) => format.render(&value)?,
        scalar => scalar.to_string(),
    };
    println!("{output}");
    Ok(())
}
