use std::sync::Arc;

use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::engine::bootstrap::{BootstrapSlot, acquire_bootstrap};
use crate::engine::core::viewer_state::{ArPhase, ViewerState};
use crate::engine::loading::config::{ConfigLoader, ViewerConfig, poll_config_load, start_config_load};
use crate::engine::loading::model_loader::{ModelAsset, ModelLoader, poll_active_load};
use crate::engine::loading::progress::{LoadProgress, LoadStatus, notify_load_status};
use crate::engine::platform::capability::{AgentClassification, CapabilityProbe, PlatformCapability};
use crate::engine::platform::detector::{PlatformProbe, detect_platform};
use crate::engine::scene::animate::idle_spin;
use crate::engine::scene::placement::recentre_primary;
use crate::engine::scene::renderer::{AttachRequest, SceneRenderer, apply_attach_requests, setup_scene};
use crate::engine::viewer::messages::{
    ViewerEvent, ViewerMessage, ViewerMessageQueue, pump_viewer_messages,
};
use crate::engine::xr::session_manager::{XrSessionManager, request_ar_stop};
use crate::rpc::viewer_rpc::{ViewerRpcInterface, ViewerRpcPlugin};

/// Teardown request from the host page or a native shortcut.
#[derive(Event, Default)]
pub struct UnmountRequested;

/// The hybrid AR viewer core: platform detection, model loading with
/// supersession, the render scene, and the XR session lifecycle, composed
/// into one state machine per app instance.
pub struct ArViewerPlugin {
    probe: Arc<dyn CapabilityProbe>,
}

impl ArViewerPlugin {
    pub fn new(probe: Arc<dyn CapabilityProbe>) -> Self {
        Self { probe }
    }

    /// Live browser probe on wasm, an unsupported-platform probe on the
    /// native preview.
    pub fn runtime_default() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            Self::new(Arc::new(
                crate::engine::platform::capability::RuntimeUserAgentProbe,
            ))
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::new(Arc::new(
                crate::engine::platform::capability::InjectableProbe::unsupported(),
            ))
        }
    }
}

impl Plugin for ArViewerPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<ViewerState>()
            .add_sub_state::<ArPhase>()
            .add_plugins(JsonAssetPlugin::<ViewerConfig>::new(&["json"]))
            .add_plugins(ViewerRpcPlugin)
            .init_resource::<ViewerMessageQueue>()
            .init_resource::<ModelLoader>()
            .init_resource::<LoadProgress>()
            .init_resource::<XrSessionManager>()
            .init_resource::<SceneRenderer>()
            .init_resource::<ConfigLoader>()
            .init_resource::<BootstrapSlot>()
            .insert_resource(PlatformProbe(self.probe.clone()))
            .add_event::<ViewerEvent>()
            .add_event::<AttachRequest>()
            .add_event::<UnmountRequested>()
            .add_systems(
                Startup,
                (acquire_bootstrap, start_config_load, detect_platform).chain(),
            )
            .add_systems(
                Update,
                (poll_config_load, pump_viewer_messages, apply_viewer_messages)
                    .chain()
                    .run_if(not(in_state(ViewerState::Unmounted))),
            )
            .add_systems(OnEnter(ViewerState::PreparingScene), setup_scene)
            .add_systems(
                Update,
                begin_initial_load.run_if(in_state(ViewerState::PreparingScene)),
            )
            .add_systems(
                Update,
                announce_ios_handoff.run_if(in_state(ViewerState::IosHandoffReady)),
            )
            .add_systems(
                Update,
                (poll_active_load, apply_attach_requests, recentre_primary)
                    .chain()
                    .run_if(in_state(ViewerState::SceneReady)),
            )
            .add_systems(Update, idle_spin.run_if(in_state(ArPhase::Idle)))
            .add_systems(
                Update,
                (notify_load_status, perform_unmount)
                    .run_if(not(in_state(ViewerState::Unmounted))),
            );
    }
}

/// Apply queued asynchronous completions, one at a time in arrival order.
pub fn apply_viewer_messages(
    mut events: EventReader<ViewerEvent>,
    mut commands: Commands,
    capability: Option<Res<PlatformCapability>>,
    classification: Option<Res<AgentClassification>>,
    mut manager: ResMut<XrSessionManager>,
    mut rpc: ResMut<ViewerRpcInterface>,
    viewer_state: Res<State<ViewerState>>,
    mut next_viewer: ResMut<NextState<ViewerState>>,
    mut next_phase: ResMut<NextState<ArPhase>>,
) {
    let mut committed = capability.is_some();
    for ViewerEvent(message) in events.read() {
        match message {
            ViewerMessage::WebXrProbeResolved(supported) => {
                // The capability is committed once; late or duplicate
                // probe answers (including after an iOS commit) are stale.
                if committed || viewer_state.get() != &ViewerState::DetectingPlatform {
                    continue;
                }
                committed = true;
                commands.insert_resource(PlatformCapability {
                    is_ios: false,
                    webxr_supported: *supported,
                });
                rpc.send_notification(
                    "platform_detected",
                    serde_json::json!({
                        "is_ios": false,
                        "webxr_supported": supported,
                        "is_mobile": classification.as_deref().is_some_and(|c| c.is_mobile),
                    }),
                );
                println!("→ Platform detected (webxr_supported: {supported})");
                next_viewer.set(ViewerState::PreparingScene);
            }
            ViewerMessage::BootstrapReady => {
                info!("Viewer bootstrap ready");
            }
            ViewerMessage::ArSessionGranted => {
                if !manager.is_requesting() {
                    continue;
                }
                manager.bind_granted();
                next_phase.set(ArPhase::Active);
                rpc.send_notification("ar_session_started", serde_json::json!({}));
                println!("→ AR session active");
            }
            ViewerMessage::ArSessionRejected { reason } => {
                manager.request_rejected();
                warn!("AR session refused by the platform: {reason}");
                rpc.send_notification(
                    "ar_unavailable",
                    serde_json::json!({ "reason": reason }),
                );
            }
            ViewerMessage::ArSessionEnded => {
                if manager.session_ended() {
                    next_phase.set(ArPhase::Idle);
                    rpc.send_notification("ar_session_ended", serde_json::json!({}));
                    println!("→ AR session ended");
                }
            }
        }
    }
}

/// Kick off the model load as soon as the configuration is known, then
/// hand over to the ready state.
pub fn begin_initial_load(
    config: Option<Res<ViewerConfig>>,
    mut loader: ResMut<ModelLoader>,
    asset_server: Res<AssetServer>,
    mut progress: ResMut<LoadProgress>,
    mut next_state: ResMut<NextState<ViewerState>>,
) {
    let Some(config) = config else {
        return;
    };
    let asset = ModelAsset::from_url(&config.glb_url);
    let request = loader.begin(&asset, &asset_server);
    progress.status = LoadStatus::Loading(request);
    println!("→ Scene prepared, loading {}", config.glb_url);
    next_state.set(ViewerState::SceneReady);
}

/// Publish the AR Quick Look hand-off once the configuration is known.
/// The host page renders the `rel="ar"` anchor; no renderer exists here.
pub fn announce_ios_handoff(
    config: Option<Res<ViewerConfig>>,
    mut rpc: ResMut<ViewerRpcInterface>,
    mut announced: Local<bool>,
) {
    if *announced {
        return;
    }
    let Some(config) = config else {
        return;
    };
    *announced = true;
    match &config.usdz_url {
        Some(usdz_url) => {
            rpc.send_notification(
                "ios_handoff_ready",
                serde_json::json!({
                    "usdz_url": usdz_url,
                    "title": config.title,
                    "rel": "ar",
                }),
            );
            println!("✓ AR Quick Look hand-off published ({usdz_url})");
        }
        None => warn!("iOS hand-off reached without a configured USDZ asset"),
    }
}

/// Tear the viewer down: cancel the in-flight load, end any live session,
/// dispose the renderer, release the bootstrap, and enter the terminal
/// state. Repeated requests are no-ops.
pub fn perform_unmount(
    mut events: EventReader<UnmountRequested>,
    mut commands: Commands,
    mut loader: ResMut<ModelLoader>,
    mut manager: ResMut<XrSessionManager>,
    mut renderer: ResMut<SceneRenderer>,
    queue: Res<ViewerMessageQueue>,
    mut slot: ResMut<BootstrapSlot>,
    mut rpc: ResMut<ViewerRpcInterface>,
    mut next_state: ResMut<NextState<ViewerState>>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    loader.invalidate();
    request_ar_stop(&manager, &queue);
    #[cfg(target_arch = "wasm32")]
    crate::engine::xr::web_session::mark_viewer_gone();
    manager.reset();
    renderer.dispose(&mut commands);
    slot.0.take();
    rpc.send_notification("viewer_unmounted", serde_json::json!({}));
    println!("→ Viewer unmounted");
    next_state.set(ViewerState::Unmounted);
}
