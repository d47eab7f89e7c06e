//! Shared tracing/logging setup for the scheduler and invoicing services.

/// Initialize process-wide observability (tracing/logging).
///
/// Safe to call multiple times; subsequent calls become no-ops. The desktop
/// shell calls this once at startup, tests call it from their setup helpers.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;
