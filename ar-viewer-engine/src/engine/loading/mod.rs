//! Asynchronous model loading with deterministic fallback.
//!
//! Every load attempt carries a monotonically increasing request id; a new
//! attempt supersedes any still-pending one, and a superseded completion is
//! discarded rather than applied, so a slow stale load can never clobber a
//! faster later one.

/// Viewer configuration manifest loading.
pub mod config;

/// Fallback primitive synthesized when a load fails.
pub mod fallback;

/// Request-id bookkeeping and load polling.
pub mod model_loader;

/// Load status tracking resource mirrored to the host page.
pub mod progress;
