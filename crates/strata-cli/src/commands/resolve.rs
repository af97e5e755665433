//! Resolve command implementation.
//!
//! Prints one mode's resolved configuration on stdout. Status and logs go to
//! stderr so the output can be piped straight into a bundler.

use tracing::{debug, info};

use strata_config::{Mode, Node, process_mode};

use crate::cli::{OutputFormat, ResolveArgs};
use crate::commands::utils;
use crate::error::{CliError, Result};
use crate::settings::CliSettings;

/// Execute the resolve command.
///
/// # Errors
///
/// Fails when no declaration can be loaded, when `--get` names a path the
/// resolved tree lacks, or when the tree cannot be written in the chosen
/// format (TOML has no null and needs a table at the top).
pub fn execute(args: ResolveArgs) -> Result<()> {
    let settings = CliSettings::load()?;
    let config = args.config.or(settings.config);
    let (path, set) = utils::load_config_set(config.as_deref())?;

    let mode = match args.mode {
        Some(mode) => {
            let mode = Mode::from(mode);
            debug!(%mode, "mode selected by --mode");
            mode
        }
        None => {
            let mode = process_mode(set.signal());
            debug!(
                %mode,
                signal = %set.signal().env,
                trigger = %set.signal().production_trigger,
                "mode selected from environment"
            );
            mode
        }
    };

    info!(%mode, path = %utils::display_path(&path), "resolving configuration");
    let resolved = set.resolve(mode);

    let node = match args.get.as_deref() {
        Some(dotted) => resolved.get(dotted).ok_or_else(|| {
            CliError::InvalidArgument(format!(
                "no value at '{dotted}' in the {mode} configuration"
            ))
        })?,
        None => resolved.root(),
    };

    let format = args.format.or(settings.format).unwrap_or_default();
    println!("{}", render(node, format)?.trim_end());
    Ok(())
}

fn render(node: &Node, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => node.to_json_pretty()?,
        OutputFormat::Toml => node.to_toml_string()?,
    };
    Ok(rendered)
}
