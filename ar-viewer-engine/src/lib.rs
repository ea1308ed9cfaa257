//! Hybrid AR viewer engine.
//!
//! Presents a single 3D asset and, depending on the platform, hands off to
//! iOS AR Quick Look, drives an in-page WebXR immersive-ar session, or
//! falls back to a plain rotating preview. One state machine per viewer
//! instance; the surrounding page talks to it over JSON-RPC.

pub mod constants;
pub mod engine;
pub mod rpc;

pub use engine::core::viewer_state::{ArPhase, ViewerState};
pub use engine::loading::config::ViewerConfig;
pub use engine::platform::capability::{CapabilityProbe, InjectableProbe, PlatformCapability};
pub use engine::viewer::controller::ArViewerPlugin;
