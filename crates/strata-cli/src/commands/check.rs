//! Check command implementation.
//!
//! Resolves the declaration in every mode and runs the checks from its
//! `validate` section, without printing the resolved trees.

use strata_config::Mode;

use crate::cli::CheckArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::settings::CliSettings;
use crate::ui;

/// Execute the check command.
///
/// # Validation Steps
///
/// 1. Load and parse the declaration (references, opaque values, limits)
/// 2. Resolve development and production
/// 3. Required paths exist in both modes
/// 4. Both modes share one shape, unless `validate.same_shape = false`
///
/// # Errors
///
/// Returns the first failure found.
pub fn execute(args: CheckArgs) -> Result<()> {
    let settings = CliSettings::load()?;
    let config = args.config.or(settings.config);
    let (path, set) = utils::load_config_set(config.as_deref())?;

    ui::info(&format!("Checking {}...", utils::display_path(&path)));

    for mode in Mode::ALL {
        let resolved = set.resolve(mode);
        let keys = resolved.root().as_mapping().map_or(0, |map| map.len());
        ui::success(&format!("  {mode} resolves ({keys} top-level keys)"));
    }

    if !set.rules().same_shape {
        ui::warning("Shape comparison disabled (validate.same_shape = false)");
    }

    if let Err(err) = strata_config::validate(&set) {
        ui::error("Validation failed");
        return Err(err.into());
    }

    ui::success("All checks passed!");
    Ok(())
}
