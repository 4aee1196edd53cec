//! Tracing initialization.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize the global tracing subscriber. Safe to call multiple times.
pub fn init() {
    INIT.call_once(|| {
        let default_level = if cfg!(debug_assertions) {
            "redsearch=debug,info"
        } else {
            "redsearch=info,warn"
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        if let Err(e) = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .compact()
            .try_init()
        {
            eprintln!("failed to initialize tracing: {e}");
        }
    });
}
