use bevy::prelude::*;

use crate::engine::platform::capability::PlatformCapability;
use crate::engine::viewer::controller::UnmountRequested;
use crate::engine::viewer::messages::ViewerMessageQueue;
use crate::engine::xr::session_manager::{XrSessionManager, request_ar_start, request_ar_stop};

/// Development shortcuts: Enter starts AR, Backspace stops it, Escape
/// unmounts the viewer. The host page drives these via RPC on wasm.
pub fn handle_viewer_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut manager: ResMut<XrSessionManager>,
    capability: Option<Res<PlatformCapability>>,
    queue: Res<ViewerMessageQueue>,
    mut unmount: EventWriter<UnmountRequested>,
) {
    if keyboard.just_pressed(KeyCode::Enter) {
        if let Err(refused) = request_ar_start(&mut manager, capability.as_deref(), &queue) {
            warn!("AR start refused: {refused}");
        }
    }
    if keyboard.just_pressed(KeyCode::Backspace) {
        request_ar_stop(&manager, &queue);
    }
    if keyboard.just_pressed(KeyCode::Escape) {
        unmount.write(UnmountRequested);
    }
}
