use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;

use crate::engine::core::window_config::create_window_config;
use crate::engine::systems::fps_feed::fps_notification_system;
use crate::engine::viewer::controller::ArViewerPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::core::viewer_state::ViewerState;
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::overlay::{spawn_status_overlay, update_status_overlay};
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::shortcuts::handle_viewer_keyboard_shortcuts;

/// Assemble the full viewer application: engine defaults, the viewer core,
/// and the presentation extras that need a real window and diagnostics.
pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(ArViewerPlugin::runtime_default())
        .add_systems(Update, fps_notification_system);

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(OnEnter(ViewerState::PreparingScene), spawn_status_overlay)
            .add_systems(
                Update,
                (update_status_overlay, handle_viewer_keyboard_shortcuts)
                    .run_if(in_state(ViewerState::SceneReady)),
            );
    }

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
