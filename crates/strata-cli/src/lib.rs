//! strata CLI - resolve mode-aware build configurations.
//!
//! This crate provides the command-line interface over `strata-config`: it
//! discovers a declaration, picks a mode, and prints the resolved tree for a
//! bundler to consume.
//!
//! # Architecture
//!
//! - [`cli`] - Argument definitions (clap derive)
//! - [`commands`] - `resolve`, `check` and `init`
//! - [`error`] - CLI error types with actionable messages
//! - [`logger`] - Structured logging with tracing
//! - [`settings`] - Defaults layered from the environment with figment
//! - [`ui`] - Status messages on stderr
//!
//! # Example
//!
//! ```rust,no_run
//! use strata_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod settings;
pub mod ui;

// Re-export commonly used types
pub use error::{CliError, Result, ResultExt};
