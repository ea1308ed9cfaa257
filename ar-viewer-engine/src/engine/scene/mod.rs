//! Scene ownership: camera, lighting, the single primary node slot, the
//! idle preview animation, and disposal.

/// Idle spin applied while no AR session is active.
pub mod animate;

/// Recentring and scaling of freshly parsed models.
pub mod placement;

/// The renderer resource and the attach/dispose systems.
pub mod renderer;
