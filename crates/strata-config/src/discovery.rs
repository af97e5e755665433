//! File-based declaration discovery for CLI use
//!
//! Handles finding and loading strata declarations from the filesystem.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::config::ConfigSet;
use crate::error::{ConfigError, Result};

/// Field of `package.json` that may hold a declaration.
pub const PACKAGE_JSON_FIELD: &str = "strata";

/// File-based declaration discovery
///
/// Searches for a declaration in conventional locations and loads it.
/// Library users with an in-memory declaration should call
/// `ConfigSet::from_value()` directly.
///
/// # Example
///
/// ```no_run
/// use strata_config::{ConfigDiscovery, Mode};
///
/// let set = ConfigDiscovery::new(".").load().unwrap();
/// let resolved = set.resolve(Mode::Production);
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    /// Create a new discovery rooted at a directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find a declaration file in the root directory
    ///
    /// Searches in this order:
    /// 1. strata.toml
    /// 2. strata.json
    /// 3. package.json (strata field)
    pub fn find(&self) -> Option<PathBuf> {
        for name in ["strata.toml", "strata.json"] {
            let path = self.root.join(name);
            if path.is_file() {
                return Some(path);
            }
        }

        let pkg_path = self.root.join("package.json");
        if pkg_path.is_file() {
            if let Ok(content) = fs::read_to_string(&pkg_path) {
                if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                    if parsed
                        .get(PACKAGE_JSON_FIELD)
                        .is_some_and(|field| !field.is_null())
                    {
                        return Some(pkg_path);
                    }
                }
            }
        }

        None
    }

    /// Load the discovered declaration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no declaration is found.
    pub fn load(&self) -> Result<ConfigSet> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        self.load_from(&path)
    }

    /// Load a declaration from a specific file; relative paths are taken from
    /// the discovery root.
    pub fn load_from(&self, path: &Path) -> Result<ConfigSet> {
        let path = self.root.join(path);
        debug!(path = %path.display(), "loading declaration");

        if path.file_name() == Some(OsStr::new("package.json")) {
            return self.load_from_package_json(&path);
        }

        match path.extension().and_then(OsStr::to_str) {
            Some("toml") => ConfigSet::from_toml_str(&fs::read_to_string(&path)?),
            Some("json") => ConfigSet::from_json_str(&fs::read_to_string(&path)?),
            other => Err(ConfigError::UnsupportedFormat(match other {
                Some(ext) => format!(".{ext} (expected .toml or .json)"),
                None => format!("{} has no extension (expected .toml or .json)", path.display()),
            })),
        }
    }

    fn load_from_package_json(&self, path: &Path) -> Result<ConfigSet> {
        let content = fs::read_to_string(path)?;

        let parsed: Value = serde_json::from_str(&content)
            .map_err(|e| ConfigError::invalid("package.json", format!("Invalid JSON: {e}")))?;

        let declaration = parsed.get(PACKAGE_JSON_FIELD).ok_or_else(|| {
            ConfigError::invalid(
                PACKAGE_JSON_FIELD,
                "Add a 'strata' field to your package.json",
            )
        })?;

        if declaration.is_null() {
            return Err(ConfigError::invalid(
                PACKAGE_JSON_FIELD,
                "The 'strata' field cannot be null",
            ));
        }

        ConfigSet::from_value(declaration.clone())
    }
}

/// Discover and load a declaration from the current directory (convenience function)
///
/// # Example
///
/// ```no_run
/// use strata_config::discover;
///
/// let set = discover().unwrap();
/// ```
pub fn discover() -> Result<ConfigSet> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load()
}
