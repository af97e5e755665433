//! Shared helpers for command implementations.

use std::path::{Path, PathBuf};

use strata_config::{ConfigDiscovery, ConfigError, ConfigSet};

use crate::error::{CliError, Result, ResultExt};

/// Get the current working directory.
pub fn get_cwd() -> Result<PathBuf> {
    std::env::current_dir()
        .map_err(|e| CliError::Custom(format!("Failed to get current directory: {}", e)))
}

/// Resolve a path relative to a working directory.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Load the declaration at `config`, or discover one in the current directory.
///
/// Returns the path that was loaded alongside the parsed set.
pub fn load_config_set(config: Option<&Path>) -> Result<(PathBuf, ConfigSet)> {
    let cwd = get_cwd()?;
    let discovery = ConfigDiscovery::new(&cwd);

    let path = match config {
        Some(path) => resolve_path(path, &cwd),
        None => discovery
            .find()
            .ok_or(CliError::Config(ConfigError::NotFound))?,
    };

    let set = discovery.load_from(&path).with_path(&path)?;
    Ok((path, set))
}

/// Render `path` relative to the current directory when possible.
pub fn display_path(path: &Path) -> String {
    get_cwd()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}
