//! Logging initialization
//!
//! The library only emits `tracing` events; the binary installs a subscriber here.

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

static INIT_ONCE: Once = Once::new();

/// Default filter when `RUST_LOG` is unset
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "rowdiff=debug"
    } else {
        "rowdiff=warn"
    }
}

/// Install a stderr subscriber. Later calls are no-ops.
///
/// `RUST_LOG` wins over `verbose` when set.
pub fn init(verbose: bool) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .finish()
            .try_init();
    });
}
