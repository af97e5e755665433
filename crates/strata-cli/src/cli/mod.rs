//! Command-line interface definition for strata.
//!
//! # Command Structure
//!
//! - `strata resolve` - Print the resolved configuration for a mode
//! - `strata check` - Validate a declaration in both modes
//! - `strata init` - Write a starter declaration

mod commands;
pub mod enums;

use clap::Parser;

pub use commands::{CheckArgs, Command, InitArgs, ResolveArgs};
pub use enums::*;

/// strata - mode-aware build configuration composer
#[derive(Parser, Debug)]
#[command(
    name = "strata",
    version,
    about = "Resolve mode-aware build configurations",
    long_about = "strata composes a bundler configuration from a shared base and one overlay\n\
                  per deployment mode (development or production), using deterministic merge\n\
                  rules, and prints the result for the bundler to consume."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    ///
    /// Shows how the mode was selected, which declaration was loaded and
    /// which merge rules applied.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
