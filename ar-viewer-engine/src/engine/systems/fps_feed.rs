use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use crate::constants::render_settings::FPS_NOTIFY_INTERVAL;
use crate::rpc::viewer_rpc::ViewerRpcInterface;

/// Push the smoothed frame rate to the host page at a fixed interval.
pub fn fps_notification_system(
    mut rpc: ResMut<ViewerRpcInterface>,
    diagnostics: Res<DiagnosticsStore>,
    mut last_send_time: Local<f32>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();
    if current_time - *last_send_time < FPS_NOTIFY_INTERVAL {
        return;
    }
    if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
        if let Some(value) = fps.smoothed() {
            rpc.send_notification(
                "fps_update",
                serde_json::json!({ "fps": value as f32 }),
            );
            *last_send_time = current_time;
        }
    }
}
