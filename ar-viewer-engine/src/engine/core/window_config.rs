use bevy::prelude::*;
use bevy::window::PresentMode;

/// Window configuration for the viewer surface.
///
/// On wasm the engine renders into the host page's canvas and tracks the
/// parent element size; natively it opens a plain preview window.
pub fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            canvas: Some("#ar-viewer".into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "AR Viewer".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}
