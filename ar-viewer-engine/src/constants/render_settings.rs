use bevy::prelude::Color;

/// Uniform scale applied to every parsed model before display
pub const MODEL_UNIFORM_SCALE: f32 = 0.5;

/// Depth in front of the camera at which the primary node is placed
pub const MODEL_VIEW_DEPTH: f32 = -1.0;

/// Per-frame Y-axis rotation increment for the idle preview spin (radians)
pub const IDLE_SPIN_STEP: f32 = 0.01;

/// Edge length of the fallback primitive shown when a load fails
pub const FALLBACK_CUBE_SIZE: f32 = 0.2;

/// Fallback primitive colour, marks the error path
pub const FALLBACK_CUBE_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);

pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

/// Ambient fill so unlit faces stay readable in the preview
pub const AMBIENT_BRIGHTNESS: f32 = 300.0;
pub const DIRECTIONAL_ILLUMINANCE: f32 = 8_000.0;

/// Interval between fps notifications to the host page (seconds)
pub const FPS_NOTIFY_INTERVAL: f32 = 0.5;
