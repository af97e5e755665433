//! Command implementations for the strata CLI.
//!
//! - [`resolve`] - Print the resolved configuration for a mode
//! - [`check`] - Validate a declaration in both modes
//! - [`init`] - Write a starter declaration
//!
//! Each command provides an `execute` function that takes the parsed
//! arguments and returns a Result.

pub mod check;
pub mod init;
pub mod resolve;
pub(crate) mod utils;

pub use check::execute as check_execute;
pub use init::execute as init_execute;
pub use resolve::execute as resolve_execute;
