//! Pluggable declaration validation strategies
//!
//! Validators run against resolved configurations, so they see exactly what a
//! bundler would receive in each mode.

use crate::config::ConfigSet;
use crate::error::{ConfigError, Result};
use crate::mode::Mode;

/// Trait for pluggable validation strategies
pub trait ConfigValidator {
    fn validate(&self, set: &ConfigSet) -> Result<()>;
}

/// Dotted paths that must exist in every resolved mode.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use strata_config::{ConfigSet, ConfigValidator, RequiredPathsValidator};
///
/// let set = ConfigSet::from_value(json!({
///     "base": { "output": { "path": "dist" } }
/// }))
/// .unwrap();
///
/// RequiredPathsValidator::new(["output.path"]).validate(&set).unwrap();
/// ```
pub struct RequiredPathsValidator {
    paths: Vec<String>,
}

impl RequiredPathsValidator {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl ConfigValidator for RequiredPathsValidator {
    fn validate(&self, set: &ConfigSet) -> Result<()> {
        if self.paths.is_empty() {
            return Ok(());
        }

        for mode in Mode::ALL {
            let resolved = set.resolve(mode);
            if let Some(path) = self.paths.iter().find(|path| resolved.get(path).is_none()) {
                return Err(ConfigError::MissingPath {
                    mode,
                    path: path.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Development and production must resolve to the same shape, so consumers
/// never branch on mode.
pub struct ShapeValidator;

impl ConfigValidator for ShapeValidator {
    fn validate(&self, set: &ConfigSet) -> Result<()> {
        let development = set.resolve(Mode::Development).shape();
        let production = set.resolve(Mode::Production).shape();

        match development.first_difference(&production) {
            None => Ok(()),
            Some(diff) => Err(ConfigError::ShapeMismatch {
                path: if diff.path.is_empty() {
                    "<root>".to_string()
                } else {
                    diff.path
                },
                development: diff.left,
                production: diff.right,
            }),
        }
    }
}

/// Run the validators enabled by the declaration's `validate` section.
pub fn validate(set: &ConfigSet) -> Result<()> {
    let rules = set.rules();
    RequiredPathsValidator::new(rules.required.iter().cloned()).validate(set)?;
    if rules.same_shape {
        ShapeValidator.validate(set)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_path_missing_in_one_mode() {
        let set = ConfigSet::from_value(json!({
            "base": {},
            "development": { "devServer": { "port": 5001 } }
        }))
        .unwrap();

        let err = RequiredPathsValidator::new(["devServer.port"])
            .validate(&set)
            .unwrap_err();
        match err {
            ConfigError::MissingPath { mode, path } => {
                assert_eq!(mode, Mode::Production);
                assert_eq!(path, "devServer.port");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn shape_validator_accepts_value_differences() {
        let set = ConfigSet::from_value(json!({
            "base": { "entry": ["init.js"], "output": { "filename": "[name].js" } },
            "development": { "entry": ["client.js"] },
            "production": { "output": { "filename": "[name]-[hash].js" } }
        }))
        .unwrap();
        assert!(ShapeValidator.validate(&set).is_ok());
    }

    #[test]
    fn shape_validator_rejects_mode_only_keys() {
        let set = ConfigSet::from_value(json!({
            "base": {},
            "development": { "devServer": { "hot": true } }
        }))
        .unwrap();

        let err = ShapeValidator.validate(&set).unwrap_err();
        match err {
            ConfigError::ShapeMismatch {
                path,
                development,
                production,
            } => {
                assert_eq!(path, "devServer");
                assert_eq!(development, "mapping");
                assert_eq!(production, "missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn validate_respects_disabled_shape_check() {
        let set = ConfigSet::from_value(json!({
            "base": {},
            "development": { "devServer": { "hot": true } },
            "validate": { "same_shape": false }
        }))
        .unwrap();
        assert!(validate(&set).is_ok());
    }

    #[test]
    fn validate_runs_required_paths_first() {
        let set = ConfigSet::from_value(json!({
            "base": {},
            "validate": { "required": ["entry"] }
        }))
        .unwrap();
        assert!(matches!(
            validate(&set).unwrap_err(),
            ConfigError::MissingPath { .. }
        ));
    }
}
