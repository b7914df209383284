//! Logging setup shared by the Bicast binaries
//!
//! Diagnostics go to stderr so publish results on stdout stay pipeable.
//! The filter comes from `BICAST_LOG` when set, otherwise from the verbose
//! flag (debug) or the default (warn).

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber
///
/// Call once at program start; a second call panics.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("BICAST_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
