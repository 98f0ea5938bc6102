//! Tracing/logging setup shared by anything embedding the engine.

pub mod tracing;

pub use tracing::init_with_filter;

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
