//! Error types for declaration loading, fragment lowering and validation.

use thiserror::Error;

use crate::mode::Mode;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Discovery errors
    #[error("config not found")]
    NotFound,

    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    // Declaration parsing errors
    #[error("invalid config value for '{field}'{}", format_hint(.hint))]
    InvalidValue { field: String, hint: Option<String> },

    /// A fragment is not a finite tree of supported nodes.
    #[error("malformed fragment at {path}: {reason}")]
    MalformedFragment { path: String, reason: String },

    // Validation errors (after resolution)
    #[error("{mode} configuration is missing required path '{path}'")]
    MissingPath { mode: Mode, path: String },

    #[error(
        "development and production resolve to different shapes at '{path}': {development} vs {production}"
    )]
    ShapeMismatch {
        path: String,
        development: String,
        production: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::MalformedFragment {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(field: impl Into<String>, hint: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            hint: Some(hint.into()),
        }
    }
}

fn format_hint(hint: &Option<String>) -> String {
    match hint {
        Some(hint) => format!(": {hint}"),
        None => String::new(),
    }
}
