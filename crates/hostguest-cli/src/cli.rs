use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan",
    version,
    about = "hostguest - Derive, round and tabulate experimental host-guest binding measurements.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Derive every system and write the JSON, CSV and LaTeX tables.
    Tabulate(TabulateArgs),
    /// Derive every system and report upper-bound substitutions and inconsistencies
    /// without writing any table.
    Check(CheckArgs),
}

/// Overrides shared by every command that reads a run configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Path to the run configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Override the measurement dataset from the config file.
    #[arg(short, long, value_name = "PATH")]
    pub measurements: Option<PathBuf>,

    /// Override the temperature (K) of the free-energy conversions.
    #[arg(short = 'T', long, value_name = "KELVIN")]
    pub temperature: Option<f64>,

    /// Override the relative titrant concentration error (e.g. 0.03 for 3%).
    #[arg(long, value_name = "FLOAT")]
    pub titrant_error: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S uncertainty.upper-bound=0.02
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `tabulate` subcommand.
#[derive(Args, Debug)]
pub struct TabulateArgs {
    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Override the directory the tables are written to.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub overrides: ConfigOverrides,
}
