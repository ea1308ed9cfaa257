mod common;

use bevy::prelude::*;

use ar_viewer_engine::engine::scene::renderer::{PrimaryNode, SceneRenderer};
use ar_viewer_engine::{PlatformCapability, ViewerState};
use common::{ANDROID_UA, IPHONE_UA, current_state, settle, test_config, viewer_app};

#[test]
fn iphone_agent_takes_the_handoff_path() {
    let mut app = viewer_app(IPHONE_UA, false, Some(test_config("models/burger.glb")));
    settle(&mut app, 5);

    assert_eq!(current_state(&app), ViewerState::IosHandoffReady);
    let capability = app.world().resource::<PlatformCapability>();
    assert!(capability.is_ios);
    assert!(!capability.webxr_supported);
}

// The iOS classification must win regardless of what the WebXR probe
// would have answered.
#[test]
fn ios_classification_ignores_the_webxr_probe() {
    let mut app = viewer_app(IPHONE_UA, true, Some(test_config("models/burger.glb")));
    settle(&mut app, 5);

    assert_eq!(current_state(&app), ViewerState::IosHandoffReady);
    let capability = app.world().resource::<PlatformCapability>();
    assert!(capability.is_ios);
    assert!(!capability.webxr_supported);
}

#[test]
fn no_renderer_is_constructed_on_ios() {
    let mut app = viewer_app(IPHONE_UA, true, Some(test_config("models/burger.glb")));
    settle(&mut app, 10);

    assert!(!app.world().resource::<SceneRenderer>().is_initialized());
    let mut cameras = app.world_mut().query_filtered::<Entity, With<Camera3d>>();
    assert_eq!(cameras.iter(app.world()).count(), 0);
    let mut primaries = app.world_mut().query_filtered::<Entity, With<PrimaryNode>>();
    assert_eq!(primaries.iter(app.world()).count(), 0);
}

#[test]
fn android_agent_with_webxr_reaches_the_scene() {
    let mut app = viewer_app(ANDROID_UA, true, Some(test_config("models/burger.glb")));
    settle(&mut app, 5);

    assert_eq!(current_state(&app), ViewerState::SceneReady);
    let capability = app.world().resource::<PlatformCapability>();
    assert!(!capability.is_ios);
    assert!(capability.webxr_supported);
    assert!(app.world().resource::<SceneRenderer>().is_initialized());
}

// Worst case is a runtime with no agent string and no XR system: both
// flags end up false and the plain preview path still comes up.
#[test]
fn unsupported_agent_still_prepares_the_preview() {
    let mut app = viewer_app("", false, Some(test_config("models/burger.glb")));
    settle(&mut app, 5);

    assert_eq!(current_state(&app), ViewerState::SceneReady);
    let capability = app.world().resource::<PlatformCapability>();
    assert!(!capability.is_ios);
    assert!(!capability.webxr_supported);
}
