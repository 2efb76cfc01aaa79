//! Diagnostic logging for the `pwvault` binary.
//!
//! Library code emits `tracing` events; this installs the subscriber
//! that prints them.  Output goes to stderr so command output on stdout
//! stays pipeable.  Verbosity comes from `PWVAULT_LOG` using the usual
//! `EnvFilter` syntax, e.g. `PWVAULT_LOG=pwvault=debug`.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "PWVAULT_LOG";

/// Install the global subscriber.  Safe to call more than once; later
/// calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
