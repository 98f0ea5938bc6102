//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize with the `RUST_LOG` filter, defaulting to `info`.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    init_with_filter(filter);
}

/// Initialize with an explicit filter; tests use this to silence or focus
/// specific services.
pub fn init_with_filter(filter: EnvFilter) {
    // JSON lines with timestamps; journal postings and order transitions
    // log structured fields, so targets add nothing.
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("observability initialized");
    }
}
