//! Deployment mode selection.
//!
//! The mode comes from exactly one external signal, an environment variable.
//! Mapping the signal to a [`Mode`] is total: only an exact match of the
//! production trigger selects [`Mode::Production`]; any other value, and an
//! unset or non-unicode variable, selects [`Mode::Development`].

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Variable read by default (set by npm to the running script's name).
pub const DEFAULT_MODE_ENV: &str = "npm_lifecycle_event";

/// Signal value that selects production by default.
pub const DEFAULT_PRODUCTION_TRIGGER: &str = "build";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Development, Mode::Production];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }

    pub fn is_production(self) -> bool {
        self == Mode::Production
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parsing for explicit user choices (flags, declarations).
///
/// The environment signal never goes through this; see [`ModeSignal::mode_for`].
impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" | "dev" => Ok(Mode::Development),
            "production" | "prod" => Ok(Mode::Production),
            other => Err(ConfigError::invalid(
                "mode",
                format!("'{other}' is not a mode; use 'development' or 'production'"),
            )),
        }
    }
}

/// Where the mode signal is read from and which value means production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeSignal {
    #[serde(default = "default_env")]
    pub env: String,

    #[serde(default = "default_trigger")]
    pub production_trigger: String,
}

impl Default for ModeSignal {
    fn default() -> Self {
        Self {
            env: default_env(),
            production_trigger: default_trigger(),
        }
    }
}

impl ModeSignal {
    pub fn new(env: impl Into<String>, production_trigger: impl Into<String>) -> Self {
        Self {
            env: env.into(),
            production_trigger: production_trigger.into(),
        }
    }

    /// Map a raw signal value to a mode.
    pub fn mode_for(&self, value: Option<&str>) -> Mode {
        match value {
            Some(value) if value == self.production_trigger => Mode::Production,
            _ => Mode::Development,
        }
    }

    /// Read the signal through `lookup` (variable name to value).
    pub fn read_with<F>(&self, lookup: F) -> Mode
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let value = lookup(&self.env);
        let mode = self.mode_for(value.as_deref());
        debug!(env = %self.env, value = ?value, %mode, "read mode signal");
        mode
    }

    /// Read the signal from the process environment.
    pub fn read(&self) -> Mode {
        self.read_with(|name| std::env::var(name).ok())
    }
}

static PROCESS_MODE: OnceLock<Mode> = OnceLock::new();

/// The process-wide mode.
///
/// The first call reads `signal` from the environment; every later call returns
/// that same mode, whatever signal it is given.
pub fn process_mode(signal: &ModeSignal) -> Mode {
    *PROCESS_MODE.get_or_init(|| signal.read())
}

fn default_env() -> String {
    DEFAULT_MODE_ENV.to_string()
}

fn default_trigger() -> String {
    DEFAULT_PRODUCTION_TRIGGER.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_selects_production() {
        let signal = ModeSignal::default();
        assert_eq!(signal.mode_for(Some("build")), Mode::Production);
    }

    #[test]
    fn unrecognized_signal_falls_back_to_development() {
        let signal = ModeSignal::default();
        assert_eq!(signal.mode_for(Some("anything-else")), Mode::Development);
        assert_eq!(signal.mode_for(Some("start")), Mode::Development);
        assert_eq!(signal.mode_for(Some("")), Mode::Development);
    }

    #[test]
    fn unset_signal_falls_back_to_development() {
        let signal = ModeSignal::default();
        assert_eq!(signal.mode_for(None), Mode::Development);
        assert_eq!(signal.read_with(|_| None), Mode::Development);
    }

    #[test]
    fn trigger_match_is_exact() {
        let signal = ModeSignal::default();
        assert_eq!(signal.mode_for(Some("Build")), Mode::Development);
        assert_eq!(signal.mode_for(Some(" build")), Mode::Development);
        assert_eq!(signal.mode_for(Some("build:prod")), Mode::Development);
    }

    #[test]
    fn read_with_looks_up_configured_variable() {
        let signal = ModeSignal::new("DEPLOY_TARGET", "release");
        let mode = signal.read_with(|name| {
            assert_eq!(name, "DEPLOY_TARGET");
            Some("release".to_string())
        });
        assert_eq!(mode, Mode::Production);
    }

    #[test]
    fn parse_is_strict() {
        assert_eq!("production".parse::<Mode>().unwrap(), Mode::Production);
        assert_eq!("dev".parse::<Mode>().unwrap(), Mode::Development);
        assert!("staging".parse::<Mode>().is_err());
    }

    #[test]
    fn signal_deserializes_with_defaults() {
        let signal: ModeSignal =
            serde_json::from_value(serde_json::json!({ "production_trigger": "release" })).unwrap();
        assert_eq!(signal.env, DEFAULT_MODE_ENV);
        assert_eq!(signal.production_trigger, "release");
    }

    #[test]
    fn process_mode_is_read_once() {
        let first = process_mode(&ModeSignal::new("STRATA_TEST_UNSET_SIGNAL", "never"));
        let second = process_mode(&ModeSignal::new("PATH", "anything"));
        assert_eq!(first, second);
    }
}
