//! Logging for the strata CLI.
//!
//! Everything goes to stderr: `resolve` prints the resolved tree on stdout
//! and a bundler reads it from there, so stdout must stay pure JSON or TOML.
//!
//! Verbosity is chosen in this order:
//! 1. `--verbose`: DEBUG for strata crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`: custom filter
//! 4. Default: INFO for strata crates
//!
//! # Example
//!
//! ```rust,no_run
//! use strata_cli::logger::init_logger;
//! use tracing::info;
//!
//! init_logger(false, false, false);
//! info!("resolving configuration");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "strata=debug,strata_cli=debug,strata_config=debug";
const QUIET_FILTER: &str = "strata=error,strata_cli=error,strata_config=error";
const DEFAULT_FILTER: &str = "strata=info,strata_cli=info,strata_config=info";

/// Initialize the tracing subscriber from the global CLI flags.
///
/// Call once, before anything logs. `verbose` wins over `RUST_LOG`.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Initialize logging with a custom filter.
///
/// ```rust,no_run
/// use strata_cli::logger::init_logger_with_filter;
/// use tracing_subscriber::EnvFilter;
///
/// init_logger_with_filter(EnvFilter::new("strata_config=trace"), true);
/// ```
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && crate::ui::should_use_color())
        .compact();

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}
