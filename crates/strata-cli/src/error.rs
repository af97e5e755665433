//! Error handling for the strata CLI.
//!
//! Library failures arrive as [`ConfigError`] and convert into [`CliError`]
//! automatically. `main` turns the final error into a `miette` report.

use std::path::PathBuf;
use thiserror::Error;

use strata_config::ConfigError;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Declaration loading, parsing or validation failed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Refusing to overwrite an existing file
    #[error("{} already exists\n\nHint: Pass --force to overwrite it", .0.display())]
    AlreadyExists(PathBuf),

    /// Environment-provided settings could not be read
    #[error("Invalid settings: {0}")]
    Settings(String),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for attaching paths to `Result` types.
pub trait ResultExt<T> {
    /// Turn "not found" I/O failures into [`CliError::FileNotFound`] for `path`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use std::path::Path;
    /// # use strata_cli::error::{Result, ResultExt};
    /// # fn run() -> Result<()> {
    /// let path = Path::new("strata.toml");
    /// std::fs::read_to_string(path).with_path(path)?;
    /// # Ok(())
    /// # }
    /// ```
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) | CliError::Config(ConfigError::Io(io_err))
                if io_err.kind() == std::io::ErrorKind::NotFound =>
            {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }
}

/// Convert a CLI error into a miette report.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::Config(ConfigError::MalformedFragment { path, reason }) => miette::miette!(
            help = "A fragment must be a finite tree; check the $ref and $opaque entries at that location",
            "Malformed fragment at {}: {}",
            path,
            reason
        ),
        CliError::Config(ConfigError::ShapeMismatch {
            path,
            development,
            production,
        }) => miette::miette!(
            help = "Declare the key in [base] so both modes carry it, or set validate.same_shape = false",
            "Modes resolve to different shapes at '{}': development has {}, production has {}",
            path,
            development,
            production
        ),
        CliError::Config(ConfigError::NotFound) => miette::miette!(
            help = "Create one with `strata init` or pass --config <path>",
            "No strata.toml, strata.json or package.json \"strata\" field found"
        ),
        other => miette::miette!("{}", other),
    }
}
