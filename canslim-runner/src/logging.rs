//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber. `RUST_LOG` wins over the `info` default.
///
/// Safe to call more than once; only the first call installs anything.
pub fn init_tracing() -> bool {
    init_tracing_with("info")
}

/// Like [`init_tracing`] with an explicit fallback directive.
pub fn init_tracing_with(default_directive: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .compact()
        .try_init()
        .is_ok()
}
