//! Presentation-side systems that sit next to the viewer core.

/// Frame-rate feed to the host page.
pub mod fps_feed;

/// Native development overlay (title, load status, fps).
#[cfg(not(target_arch = "wasm32"))]
pub mod overlay;

/// Native development shortcuts for the AR lifecycle.
#[cfg(not(target_arch = "wasm32"))]
pub mod shortcuts;
