//! Diagnostic logging to stderr.

use tracing_subscriber::EnvFilter;

use crate::constants::LOG_ENV;

/// Install the global subscriber.
///
/// `COSTFLOOR_LOG` takes precedence; otherwise `--verbose` shows the
/// hasher's debug events and the default shows warnings only.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,costfloor_core=debug,costfloor_cli=debug"
    } else {
        "warn"
    }
}
