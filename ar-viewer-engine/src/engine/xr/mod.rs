//! WebXR session lifecycle.
//!
//! At most one session handle is live per renderer, at most one platform
//! request is in flight, and the handle is cleared exactly once by the
//! session-ended message.

/// Session handle ownership and the start/stop guards.
pub mod session_manager;

/// Browser-side session plumbing.
#[cfg(target_arch = "wasm32")]
pub mod web_session;
