//! Show command implementation.

use anyhow::Result;
use envy_config::Resolver;
use tracing::debug;

use crate::formatters::OutputFormat;

pub fn run(resolver: &Resolver, output_format: &str, raw: bool) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;

    let settings = if raw {
        resolver.settings()
    } else {
        resolver.globals()
    };
    debug!(keys = settings.len(), raw, "Printing settings");

    println!("{}", format.render_mapping(settings)?);
    Ok(())
}
