mod common;

use bevy::prelude::*;

use ar_viewer_engine::engine::scene::renderer::{PrimaryNode, SceneRenderer};
use ar_viewer_engine::engine::viewer::controller::UnmountRequested;
use ar_viewer_engine::engine::viewer::messages::{ViewerMessage, ViewerMessageQueue};
use ar_viewer_engine::engine::xr::session_manager::{XrSessionManager, request_ar_start};
use ar_viewer_engine::engine::loading::progress::{LoadProgress, LoadStatus};
use ar_viewer_engine::rpc::viewer_rpc::RpcInbox;
use ar_viewer_engine::{PlatformCapability, ViewerState};
use common::{ANDROID_UA, current_state, settle, settle_until, test_config, viewer_app};

fn primary_count(app: &mut App) -> usize {
    let mut primaries = app.world_mut().query_filtered::<Entity, With<PrimaryNode>>();
    primaries.iter(app.world()).count()
}

fn ready_app() -> App {
    let mut app = viewer_app(ANDROID_UA, true, Some(test_config("models/missing.glb")));
    settle_until(&mut app, "scene becomes ready", |app| {
        app.world().resource::<LoadProgress>().status == LoadStatus::Error
    });
    app
}

#[test]
fn unmount_releases_every_resource() {
    let mut app = ready_app();

    // Put a session live so teardown has everything to unwind.
    {
        let capability = *app.world().resource::<PlatformCapability>();
        let queue = app.world().resource::<ViewerMessageQueue>().clone();
        let mut manager = app.world_mut().resource_mut::<XrSessionManager>();
        request_ar_start(&mut manager, Some(&capability), &queue).expect("start accepted");
    }
    app.world()
        .resource::<ViewerMessageQueue>()
        .push(ViewerMessage::ArSessionGranted);
    settle(&mut app, 2);
    assert!(app.world().resource::<XrSessionManager>().has_live_session());

    app.world_mut().send_event(UnmountRequested);
    settle(&mut app, 3);

    assert_eq!(current_state(&app), ViewerState::Unmounted);
    assert_eq!(app.world().resource::<SceneRenderer>().gpu_handle_count(), 0);
    assert!(!app.world().resource::<XrSessionManager>().has_live_session());
    assert_eq!(primary_count(&mut app), 0);
}

#[test]
fn unmount_is_terminal_and_repeatable() {
    let mut app = ready_app();
    app.world_mut().send_event(UnmountRequested);
    settle(&mut app, 3);
    assert_eq!(current_state(&app), ViewerState::Unmounted);

    // A second teardown request is a tolerated no-op.
    app.world_mut().send_event(UnmountRequested);
    settle(&mut app, 3);
    assert_eq!(current_state(&app), ViewerState::Unmounted);
    assert_eq!(app.world().resource::<SceneRenderer>().gpu_handle_count(), 0);
}

#[test]
fn unmount_invalidates_the_pending_load() {
    let mut app = viewer_app(ANDROID_UA, true, Some(test_config("models/missing.glb")));
    settle_until(&mut app, "scene becomes ready", |app| {
        current_state(app) == ViewerState::SceneReady
    });

    // Tear down while the load may still be in flight; its eventual
    // completion must be ignored.
    app.world_mut().send_event(UnmountRequested);
    settle(&mut app, 10);

    assert_eq!(current_state(&app), ViewerState::Unmounted);
    assert_eq!(primary_count(&mut app), 0);
    assert_eq!(app.world().resource::<SceneRenderer>().gpu_handle_count(), 0);
}

// Commands arriving over RPC after the terminal state must not restart
// anything.
#[test]
fn rpc_start_after_unmount_is_refused() {
    let mut app = ready_app();
    app.world_mut().send_event(UnmountRequested);
    settle(&mut app, 3);
    assert_eq!(current_state(&app), ViewerState::Unmounted);

    app.world()
        .resource::<RpcInbox>()
        .push(r#"{"jsonrpc":"2.0","method":"start_ar","id":1}"#);
    settle(&mut app, 3);

    let manager = app.world().resource::<XrSessionManager>();
    assert!(!manager.is_requesting());
    assert!(!manager.has_live_session());
}

#[test]
fn rpc_start_ar_reaches_the_session_manager() {
    let mut app = ready_app();
    app.world()
        .resource::<RpcInbox>()
        .push(r#"{"jsonrpc":"2.0","method":"start_ar","id":7}"#);
    settle(&mut app, 2);

    assert!(app.world().resource::<XrSessionManager>().is_requesting());
}

#[test]
fn rpc_unmount_tears_the_viewer_down() {
    let mut app = ready_app();
    app.world()
        .resource::<RpcInbox>()
        .push(r#"{"jsonrpc":"2.0","method":"unmount","id":2}"#);
    settle(&mut app, 4);

    assert_eq!(current_state(&app), ViewerState::Unmounted);
}

// The iOS path never constructs a loader target: status stays idle and
// the hand-off is the only output.
#[test]
fn ios_path_keeps_the_load_status_idle() {
    let mut app = viewer_app(
        common::IPHONE_UA,
        false,
        Some(test_config("models/burger.glb")),
    );
    settle(&mut app, 10);

    assert_eq!(current_state(&app), ViewerState::IosHandoffReady);
    assert_eq!(
        app.world().resource::<LoadProgress>().status,
        LoadStatus::Idle
    );
    assert_eq!(primary_count(&mut app), 0);
}
