//! Application setup and the viewer lifecycle states.

/// App assembly for the native preview and the wasm deployment.
pub mod app_setup;

/// Lifecycle state machine of one viewer instance.
pub mod viewer_state;

/// Platform-specific window configuration.
pub mod window_config;
