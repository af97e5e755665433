use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::enums::*;

/// Available strata subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the declaration for one mode and print it
    ///
    /// Without --mode, the mode comes from the declaration's signal variable
    /// (npm_lifecycle_event by default): its production trigger ("build")
    /// selects production, anything else selects development.
    Resolve(ResolveArgs),

    /// Validate a declaration
    ///
    /// Parses the declaration, resolves both modes and runs the checks from
    /// its [validate] section.
    Check(CheckArgs),

    /// Write a starter declaration
    Init(InitArgs),
}

/// Arguments for the resolve command
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Path to the declaration (default: discovered in the current directory)
    ///
    /// Falls back to STRATA_CONFIG when not given.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Mode to resolve, overriding the environment signal
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Output format (default: json, or STRATA_FORMAT)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Print only the node at this dotted path (e.g. output.filename)
    #[arg(short, long, value_name = "PATH")]
    pub get: Option<String>,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the declaration (default: discovered in the current directory)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write strata.toml into
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub dir: PathBuf,

    /// Overwrite an existing strata.toml
    #[arg(long)]
    pub force: bool,
}
