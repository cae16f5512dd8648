//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse command-line arguments and environment variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not build the resolver (see `dispatch::build_resolver`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use envy_config::constants::DEFAULT_ENV_VAR;

#[derive(Parser)]
#[command(name = "envy")]
#[command(about = "Envy - Resolve environment-layered settings from the command line", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  envy -s config/settings.yml show\n  envy -s settings.yml --env-dir config -e ,prod get db.host\n  ENVY_ENV=prod envy -s settings.json environments\n  envy -s settings.ini --set debug=true -o yaml show\n"
)]
pub struct Cli {
    /// Config source file (env, ini, json, yml/yaml, toml, xml); repeatable, later wins
    #[arg(short, long = "source", global = true, value_name = "FILE")]
    pub sources: Vec<PathBuf>,

    /// Directory holding `.env` and `.env.<environment>` files; repeatable
    #[arg(long = "env-dir", global = true, value_name = "DIR")]
    pub env_dirs: Vec<PathBuf>,

    /// Comma-separated active environments (e.g. ",prod"); overrides --env-var
    #[arg(short, long = "env", global = true, value_name = "NAMES", allow_hyphen_values = true)]
    pub environments: Option<String>,

    /// Environment variable holding the comma-separated active environments
    #[arg(long, global = true, default_value = DEFAULT_ENV_VAR, value_name = "VAR")]
    pub env_var: String,

    /// Override a resolved setting (KEY=VALUE, value decoded as JSON when possible); repeatable
    #[arg(long = "set", global = true, value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    /// Output format (json, yaml, env)
    #[arg(short, long, global = true, default_value = "json")]
    pub output: String,

    /// Replace unresolvable `<% key %>` placeholders with an empty string
    #[arg(long, global = true)]
    pub remove_unresolved: bool,

    /// Keep keys as they are instead of expanding `a_b` and `a.b` into nested settings
    #[arg(long, global = true)]
    pub no_expand: bool,

    /// Expand keys of env and INI files only; structured sources keep theirs
    #[arg(long, global = true, conflicts_with = "no_expand")]
    pub flat_only: bool,

    /// Characters separating nesting levels in keys
    #[arg(long, global = true, default_value = "_.", value_name = "CHARS")]
    pub separators: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the resolved settings
    Show {
        /// Print the raw settings as loaded, before environment resolution
        #[arg(long)]
        raw: bool,
    },

    /// Print a single resolved setting (dotted paths reach nested settings)
    Get {
        /// Setting name or dotted path (e.g. `db.host`)
        key: String,
    },

    /// Exit successfully if a setting or active environment exists
    Has {
        /// Setting or environment name
        key: String,
    },

    /// List the active environments in activation order
    Environments,
}
