//! CLI defaults layered from the environment.
//!
//! Priority: command-line flags > `STRATA_*` environment variables > built-in
//! defaults. Flags are applied by the commands themselves; this module only
//! covers the lower two layers.

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cli::OutputFormat;
use crate::error::{CliError, Result};

/// Environment variable prefix for CLI settings.
pub const ENV_PREFIX: &str = "STRATA_";

/// Settings the CLI reads before running a command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliSettings {
    /// Declaration path used when `--config` is absent (`STRATA_CONFIG`)
    pub config: Option<PathBuf>,

    /// Output format used when `--format` is absent (`STRATA_FORMAT`)
    pub format: Option<OutputFormat>,
}

impl CliSettings {
    /// Load settings from defaults and the process environment.
    pub fn load() -> Result<Self> {
        Self::figment().extract().map_err(|e| {
            CliError::Settings(format!(
                "{e}\n\nHint: STRATA_FORMAT accepts \"json\" or \"toml\""
            ))
        })
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(ENV_PREFIX).only(&["config", "format"]))
    }
}
