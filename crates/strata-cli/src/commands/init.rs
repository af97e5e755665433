//! Init command implementation.
//!
//! Writes a starter `strata.toml` covering a typical bundler setup: shared
//! output and loaders in the base, a dev server client in development, and
//! hashed filenames plus extra plugins in production.

use std::fs;

use tracing::debug;

use crate::cli::InitArgs;
use crate::commands::utils;
use crate::error::{CliError, Result};
use crate::ui;

/// Starter declaration written by `strata init`.
pub const TEMPLATE: &str = include_str!("../../templates/strata.toml");

/// Execute the init command.
///
/// # Errors
///
/// Refuses to replace an existing `strata.toml` unless `--force` is given.
pub fn execute(args: InitArgs) -> Result<()> {
    let dir = utils::resolve_path(&args.dir, &utils::get_cwd()?);
    let target = dir.join("strata.toml");

    if target.exists() && !args.force {
        return Err(CliError::AlreadyExists(target));
    }

    fs::create_dir_all(&dir)?;
    fs::write(&target, TEMPLATE)?;
    debug!(path = %target.display(), bytes = TEMPLATE.len(), "wrote starter declaration");

    ui::success(&format!("Created {}", utils::display_path(&target)));
    ui::info("Run `strata check` to validate it, then `strata resolve` to print it");
    Ok(())
}
