//! Environments command implementation.

use anyhow::Result;
use envy_config::{Resolver, Value};

use crate::formatters::OutputFormat;

pub fn run(resolver: &Resolver, output_format: &str) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;

    let names = resolver.environments();
    let output = match format {
        OutputFormat::Env => names.join(","),
        _ => format.render(&Value::List(
            names.iter().map(|name| Value::from(name.as_str())).collect(),
        ))?,
    };
    println!("{output}");
    Ok(())
}
