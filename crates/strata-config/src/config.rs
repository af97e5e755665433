//! Declarations: a base fragment, one overlay per mode, and the policies that
//! govern resolving them.
//!
//! For file discovery, see the `discovery` module.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::compose::{Composer, ResolvedConfig};
use crate::error::{ConfigError, Result as ConfigResult};
use crate::fragment::{Fragment, Lowering, parse_toml, toml_to_json};
use crate::merge::MergePolicy;
use crate::mode::{Mode, ModeSignal, process_mode};

/// Top-level sections a declaration may contain.
pub const SECTIONS: [&str; 7] = [
    "base",
    "development",
    "production",
    "defs",
    "mode",
    "merge",
    "validate",
];

/// Checks run by [`crate::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRules {
    /// Dotted paths that must exist in every resolved mode.
    #[serde(default)]
    pub required: Vec<String>,

    /// Require development and production to resolve to the same shape.
    #[serde(default = "default_true")]
    pub same_shape: bool,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            required: Vec::new(),
            same_shape: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigSet {
    base: Fragment,
    development: Fragment,
    production: Fragment,
    signal: ModeSignal,
    composer: Composer,
    rules: ValidationRules,
}

impl ConfigSet {
    /// A set with `base` and empty overlays.
    pub fn new(base: Fragment) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    pub fn with_overlay(mut self, mode: Mode, overlay: Fragment) -> Self {
        match mode {
            Mode::Development => self.development = overlay,
            Mode::Production => self.production = overlay,
        }
        self
    }

    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.composer = Composer::new(policy);
        self
    }

    pub fn with_signal(mut self, signal: ModeSignal) -> Self {
        self.signal = signal;
        self
    }

    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.rules = rules;
        self
    }

    /// Create from a declaration value (from a file, a database, an API).
    ///
    /// `$ref` pointers anywhere in the declaration resolve against the whole
    /// document, so overlays may reuse values from `base` or `defs`.
    ///
    /// # Example
    ///
    /// ```
    /// use serde_json::json;
    /// use strata_config::{ConfigSet, Mode};
    ///
    /// let set = ConfigSet::from_value(json!({
    ///     "defs": { "entry": "src/js/init.js" },
    ///     "base": { "entry": [{ "$ref": "#/defs/entry" }] },
    ///     "development": { "entry": ["webpack-dev-server/client"] }
    /// }))
    /// .unwrap();
    ///
    /// let dev = set.resolve(Mode::Development);
    /// assert_eq!(dev.to_value()["entry"], json!(["src/js/init.js", "webpack-dev-server/client"]));
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        let object = value.as_object().ok_or_else(|| {
            ConfigError::invalid(
                "declaration",
                "a declaration must be a table with a 'base' section",
            )
        })?;

        if let Some(unknown) = object
            .keys()
            .find(|key| !SECTIONS.contains(&key.as_str()))
        {
            return Err(ConfigError::invalid(
                unknown.clone(),
                format!("unknown section; expected one of {}", SECTIONS.join(", ")),
            ));
        }

        let base_value = object.get("base").ok_or_else(|| {
            ConfigError::invalid("base", "add a 'base' section (it may be empty)")
        })?;

        let mut lowering = Lowering::new(&value);
        let base = lowering.fragment(base_value, "/base")?;
        let development = overlay_section(&mut lowering, object.get("development"), "development")?;
        let production = overlay_section(&mut lowering, object.get("production"), "production")?;

        let signal: ModeSignal = section(object.get("mode"), "mode")?;
        let policy: MergePolicy = section(object.get("merge"), "merge")?;
        let rules: ValidationRules = section(object.get("validate"), "validate")?;

        debug!(
            mode_env = %signal.env,
            sequence_rules = policy.sequences.len(),
            required = rules.required.len(),
            "loaded declaration"
        );

        Ok(Self {
            base,
            development,
            production,
            signal,
            composer: Composer::new(policy),
            rules,
        })
    }

    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| ConfigError::invalid("json", format!("Invalid JSON syntax: {e}")))?;
        Self::from_value(value)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let value = toml_to_json(&parse_toml(content)?, "")?;
        Self::from_value(value)
    }

    pub fn base(&self) -> &Fragment {
        &self.base
    }

    pub fn overlay(&self, mode: Mode) -> &Fragment {
        match mode {
            Mode::Development => &self.development,
            Mode::Production => &self.production,
        }
    }

    pub fn signal(&self) -> &ModeSignal {
        &self.signal
    }

    pub fn policy(&self) -> &MergePolicy {
        self.composer.policy()
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Resolve the base with the overlay for `mode`.
    pub fn resolve(&self, mode: Mode) -> ResolvedConfig {
        debug!(%mode, "resolving declaration");
        self.composer
            .resolve(&self.base, self.overlay(mode))
            .with_mode(mode)
    }

    /// Resolve for the process-wide mode (see [`process_mode`]).
    pub fn resolve_from_env(&self) -> ResolvedConfig {
        self.resolve(process_mode(&self.signal))
    }
}

fn overlay_section(
    lowering: &mut Lowering<'_>,
    value: Option<&Value>,
    name: &str,
) -> ConfigResult<Fragment> {
    match value {
        None | Some(Value::Null) => Ok(Fragment::empty()),
        Some(value) => lowering.fragment(value, &format!("/{name}")),
    }
}

fn section<T>(value: Option<&Value>, name: &str) -> ConfigResult<T>
where
    T: Default + for<'de> Deserialize<'de>,
{
    match value {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| ConfigError::invalid(name, e.to_string())),
    }
}

fn default_true() -> bool {
    true
}
