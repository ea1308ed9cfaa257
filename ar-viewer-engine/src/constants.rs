/// Shared tunables for the viewer scene and platform classification.
pub mod platform;
pub mod render_settings;
