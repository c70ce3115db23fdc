//! Tracing subscriber setup.
//!
//! The container crates only emit `tracing` events; installing a
//! subscriber is left to the host. This helper covers the common case.

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Installs a formatted `tracing` subscriber filtered by `directives`.
///
/// `RUST_LOG` takes precedence when set. Calling this more than once is
/// harmless: later calls leave the first subscriber in place and return
/// `false`.
///
/// ```
/// use sijill_support::logging::init_tracing;
///
/// init_tracing("sijill=debug");
/// assert!(!init_tracing("sijill=trace"));
/// ```
pub fn init_tracing(directives: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        debug!(directives, "Tracing subscriber installed");
    }
    installed
}
