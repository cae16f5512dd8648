//! Resolver construction and command dispatch.
//!
//! Responsibilities:
//! - Translate global CLI options into a `ResolverBuilder` chain.
//! - Apply `--set` overrides (dotted keys nest) and route to the selected command.
//!
//! Does NOT handle:
//! - Output formatting (see `formatters`).
//! - Exit code mapping (see `error`).
//!
//! Invariants:
//! - `--env` wins over `--env-var`; without either the default variable is read.
//! - Sources load in command-line order, files before env directories.

use anyhow::{Context, Result};
use envy_config::{
    KeyExpander, KeyExpansion, Mapping, Resolver, UnresolvedPlaceholder, Value,
    parse_environment_list, selector,
};

use crate::args::{Cli, Commands};
use crate::commands;
use crate::error::InvalidArgument;

/// Build the resolver described by the global options.
pub fn build_resolver(cli: &Cli) -> Result<Resolver> {
    let separators: Vec<char> = cli.separators.chars().collect();
    if separators.is_empty() {
        return Err(InvalidArgument("--separators must not be empty".to_string()).into());
    }

    let key_expansion = if cli.no_expand {
        KeyExpansion::Never
    } else if cli.flat_only {
        KeyExpansion::FlatSources
    } else {
        KeyExpansion::All
    };
    let unresolved = if cli.remove_unresolved {
        UnresolvedPlaceholder::Remove
    } else {
        UnresolvedPlaceholder::Keep
    };

    let mut builder = Resolver::builder()
        .key_expansion(key_expansion)
        .separators(&separators)
        .unresolved(unresolved);

    for source in &cli.sources {
        builder = builder.source(source.clone());
    }
    for dir in &cli.env_dirs {
        builder = builder.env_dir(dir.clone());
    }

    builder = match &cli.environments {
        Some(names) => builder.environments(parse_environment_list(names)),
        None => builder.selector(selector::from_env_var(cli.env_var.clone())),
    };

    let mut resolver = builder.build().context("Failed to load settings")?;

    // Dotted keys nest, so `--set db.host=x` keeps the other `db` settings.
    let mut overrides = Mapping::new();
    let expander = KeyExpander::new(&['.']);
    for assignment in &cli.overrides {
        let (key, raw) = parse_assignment(assignment)?;
        expander.insert(&mut overrides, key, Value::decode_scalar(raw));
    }
    for (key, value) in overrides {
        resolver.set(key, value);
    }

    tracing::debug!(
        environments = ?resolver.environments(),
        sources = cli.sources.len(),
        env_dirs = cli.env_dirs.len(),
        "Settings resolver ready"
    );
    Ok(resolver)
}

fn parse_assignment(assignment: &str) -> Result<(&str, &str)> {
    match assignment.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(InvalidArgument(format!(
            "Invalid --set value '{assignment}'. Expected KEY=VALUE"
        ))
        .into()),
    }
}

/// Run the selected command against a freshly built resolver.
pub fn run_command(cli: Cli) -> Result<()> {
    let resolver = build_resolver(&cli)?;

    match &cli.command {
        Commands::Show { raw } => commands::show::run(&resolver, &cli.output, *raw),
        Commands::Get { key } => commands::get::run(&resolver, &cli.output, key),
        Commands::Has { key } => commands::has::run(&resolver, key),
        Commands::Environments => commands::environments::run(&resolver, &cli.output),
    }
}
