use std::sync::Arc;

use bevy::prelude::*;

use crate::engine::core::viewer_state::ViewerState;
use crate::engine::platform::capability::{
    AgentClassification, CapabilityProbe, PlatformCapability, is_ios_user_agent,
    is_mobile_user_agent,
};
use crate::engine::viewer::messages::ViewerMessageQueue;
use crate::rpc::viewer_rpc::ViewerRpcInterface;

/// The probe backing platform detection for this viewer instance.
#[derive(Resource, Clone)]
pub struct PlatformProbe(pub Arc<dyn CapabilityProbe>);

/// Classify the runtime once at startup.
///
/// The iOS decision is synchronous and final: on an iOS agent the
/// capability commits immediately with `webxr_supported = false` and the
/// renderer path is never entered. Every other agent fires the one-time
/// WebXR probe and the capability commits when its answer arrives on the
/// message queue.
pub fn detect_platform(
    mut commands: Commands,
    probe: Res<PlatformProbe>,
    queue: Res<ViewerMessageQueue>,
    mut next_state: ResMut<NextState<ViewerState>>,
    mut rpc: ResMut<ViewerRpcInterface>,
) {
    let agent = probe.0.user_agent().unwrap_or_default();
    let classification = AgentClassification {
        is_mobile: is_mobile_user_agent(&agent),
    };
    commands.insert_resource(classification);

    if is_ios_user_agent(&agent) {
        let capability = PlatformCapability {
            is_ios: true,
            webxr_supported: false,
        };
        commands.insert_resource(capability);
        rpc.send_notification(
            "platform_detected",
            serde_json::json!({
                "is_ios": true,
                "webxr_supported": false,
                "is_mobile": classification.is_mobile,
            }),
        );
        println!("→ iOS agent detected, taking the AR Quick Look hand-off path");
        next_state.set(ViewerState::IosHandoffReady);
        return;
    }

    println!("→ Probing WebXR immersive-ar capability");
    probe.0.probe_webxr(&queue);
}
