//! Platform classification for the hybrid AR paths.
//!
//! Decides between the iOS AR Quick Look hand-off, the in-page WebXR
//! session, and the plain rotating preview on unsupported devices.

/// Capability flags and the probe trait with its runtime and injectable variants.
pub mod capability;

/// Detection system committing the capability once per viewer mount.
pub mod detector;
