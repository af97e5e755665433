//! strata CLI - resolve mode-aware build configurations.
//!
//! This is the main entry point. It handles command-line argument parsing,
//! logging initialization, and command dispatch.

use clap::Parser;
use miette::Result;
use strata_cli::{cli, commands, error, logger, ui};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = cli::Cli::parse();

    // Initialize logging and colors based on global flags
    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);
    ui::set_quiet(args.quiet);

    let result = match args.command {
        cli::Command::Resolve(resolve_args) => commands::resolve_execute(resolve_args),
        cli::Command::Check(check_args) => commands::check_execute(check_args),
        cli::Command::Init(init_args) => commands::init_execute(init_args),
    };

    // Convert CLI errors to miette diagnostics for error reporting
    result.map_err(error::cli_error_to_miette)
}
