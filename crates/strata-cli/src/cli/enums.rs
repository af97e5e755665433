use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strata_config::Mode;

/// Deployment mode chosen on the command line
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum ModeArg {
    /// Base merged with the development overlay
    #[value(name = "development", alias = "dev")]
    Development,

    /// Base merged with the production overlay
    #[value(name = "production", alias = "prod")]
    Production,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Development => Mode::Development,
            ModeArg::Production => Mode::Production,
        }
    }
}

/// Output format for resolved configurations
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    #[value(name = "json")]
    Json,

    /// TOML (fails on null values, which TOML cannot express)
    #[value(name = "toml")]
    Toml,
}
