//! Logging initialization.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence; otherwise only warnings are shown, or
/// gapsheet debug events with `--verbose`. Logs go to stderr so stdout stays
/// clean for `--json`.
pub fn init(verbose: bool) {
    let default = if verbose { "warn,gapsheet=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
}
