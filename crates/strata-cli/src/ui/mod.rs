//! Status messages for the terminal.
//!
//! All output here goes to stderr; stdout is reserved for resolved
//! configurations.
//!
//! ```no_run
//! use strata_cli::ui;
//!
//! ui::init_colors(false);
//! ui::info("Checking strata.toml");
//! ui::success("All checks passed!");
//! ```

mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use messages::{error, info, success, warning};

static COLORS: AtomicBool = AtomicBool::new(false);
static QUIET: AtomicBool = AtomicBool::new(false);

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
}

/// Check if color output should be enabled.
///
/// `NO_COLOR` wins over `FORCE_COLOR`; otherwise colors follow whether
/// stderr is attended by a user.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::user_attended_stderr() && !is_ci()
}

/// Decide once whether status messages are colored.
pub fn init_colors(no_color: bool) {
    COLORS.store(!no_color && should_use_color(), Ordering::Relaxed);
}

/// Suppress every status message except errors.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

pub(crate) fn quiet_enabled() -> bool {
    QUIET.load(Ordering::Relaxed)
}
