//! Status message functions for terminal output.

use owo_colors::OwoColorize;

use super::{colors_enabled, quiet_enabled};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Success,
    Info,
    Warning,
    Error,
}

/// Print a success message to stderr.
///
/// ```no_run
/// use strata_cli::ui::success;
///
/// success("All checks passed!");
/// ```
pub fn success(message: &str) {
    emit(Level::Success, message);
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    emit(Level::Info, message);
}

/// Print a warning message to stderr.
pub fn warning(message: &str) {
    emit(Level::Warning, message);
}

/// Print an error message to stderr. Shown even with `--quiet`.
pub fn error(message: &str) {
    emit(Level::Error, message);
}

fn emit(level: Level, message: &str) {
    if let Some(line) = render(level, message, colors_enabled(), quiet_enabled()) {
        eprintln!("{line}");
    }
}

fn render(level: Level, message: &str, colors: bool, quiet: bool) -> Option<String> {
    if quiet && level != Level::Error {
        return None;
    }

    let glyph = match level {
        Level::Success => "✓",
        Level::Info => "ℹ",
        Level::Warning => "⚠",
        Level::Error => "✗",
    };

    if !colors {
        return Some(format!("{glyph} {message}"));
    }

    Some(match level {
        Level::Success => format!("{} {}", glyph.green().bold(), message),
        Level::Info => format!("{} {}", glyph.blue().bold(), message),
        Level::Warning => format!("{} {}", glyph.yellow().bold(), message.yellow()),
        Level::Error => format!("{} {}", glyph.red().bold(), message.red()),
    })
}
