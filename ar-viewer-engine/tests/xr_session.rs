mod common;

use bevy::prelude::*;

use ar_viewer_engine::engine::scene::renderer::SceneRenderer;
use ar_viewer_engine::engine::viewer::messages::{ViewerMessage, ViewerMessageQueue};
use ar_viewer_engine::engine::xr::session_manager::{
    StartArError, XrSessionManager, request_ar_start,
};
use ar_viewer_engine::{ArPhase, PlatformCapability, ViewerState};
use common::{ANDROID_UA, current_state, settle, settle_until, test_config, viewer_app};

fn ready_app() -> App {
    let mut app = viewer_app(ANDROID_UA, true, Some(test_config("models/missing.glb")));
    settle_until(&mut app, "scene becomes ready", |app| {
        current_state(app) == ViewerState::SceneReady
            && app.world().resource::<SceneRenderer>().primary().is_some()
    });
    app
}

fn start_ar(app: &mut App) -> Result<(), StartArError> {
    let capability = *app.world().resource::<PlatformCapability>();
    let queue = app.world().resource::<ViewerMessageQueue>().clone();
    let mut manager = app.world_mut().resource_mut::<XrSessionManager>();
    request_ar_start(&mut manager, Some(&capability), &queue)
}

fn ar_phase(app: &App) -> Option<ArPhase> {
    app.world()
        .get_resource::<State<ArPhase>>()
        .map(|phase| *phase.get())
}

#[test]
fn granted_session_activates_the_ar_phase() {
    let mut app = ready_app();
    assert_eq!(ar_phase(&app), Some(ArPhase::Idle));

    start_ar(&mut app).expect("start accepted");
    app.world()
        .resource::<ViewerMessageQueue>()
        .push(ViewerMessage::ArSessionGranted);
    settle(&mut app, 2);

    assert_eq!(ar_phase(&app), Some(ArPhase::Active));
    assert!(app.world().resource::<XrSessionManager>().has_live_session());
}

#[test]
fn start_while_live_returns_already_active() {
    let mut app = ready_app();
    start_ar(&mut app).expect("start accepted");
    app.world()
        .resource::<ViewerMessageQueue>()
        .push(ViewerMessage::ArSessionGranted);
    settle(&mut app, 2);

    assert_eq!(start_ar(&mut app), Err(StartArError::AlreadyActive));
    // The refused start must not have issued a second platform request.
    assert!(!app.world().resource::<XrSessionManager>().is_requesting());
}

#[test]
fn idle_spin_is_suspended_while_ar_is_active() {
    let mut app = ready_app();
    let primary = app
        .world()
        .resource::<SceneRenderer>()
        .primary()
        .expect("primary");

    // Spinning while idle.
    let before = app.world().get::<Transform>(primary).expect("transform").rotation;
    settle(&mut app, 3);
    let after = app.world().get::<Transform>(primary).expect("transform").rotation;
    assert_ne!(before, after);

    start_ar(&mut app).expect("start accepted");
    app.world()
        .resource::<ViewerMessageQueue>()
        .push(ViewerMessage::ArSessionGranted);
    settle(&mut app, 2);
    assert_eq!(ar_phase(&app), Some(ArPhase::Active));

    // Device-driven pose: the idle increment must stay suspended.
    let frozen = app.world().get::<Transform>(primary).expect("transform").rotation;
    settle(&mut app, 5);
    let still = app.world().get::<Transform>(primary).expect("transform").rotation;
    assert_eq!(frozen, still);

    // Session end resumes the preview spin.
    app.world()
        .resource::<ViewerMessageQueue>()
        .push(ViewerMessage::ArSessionEnded);
    settle(&mut app, 3);
    assert_eq!(ar_phase(&app), Some(ArPhase::Idle));
    let resumed = app.world().get::<Transform>(primary).expect("transform").rotation;
    assert_ne!(frozen, resumed);
}

#[test]
fn platform_end_clears_the_handle_once() {
    let mut app = ready_app();
    start_ar(&mut app).expect("start accepted");
    app.world()
        .resource::<ViewerMessageQueue>()
        .push(ViewerMessage::ArSessionGranted);
    settle(&mut app, 2);

    app.world()
        .resource::<ViewerMessageQueue>()
        .push(ViewerMessage::ArSessionEnded);
    settle(&mut app, 2);
    assert!(!app.world().resource::<XrSessionManager>().has_live_session());
    assert_eq!(ar_phase(&app), Some(ArPhase::Idle));

    // A duplicate end (stop after self-ended session) stays a no-op.
    app.world()
        .resource::<ViewerMessageQueue>()
        .push(ViewerMessage::ArSessionEnded);
    settle(&mut app, 2);
    assert!(!app.world().resource::<XrSessionManager>().has_live_session());
    assert_eq!(ar_phase(&app), Some(ArPhase::Idle));
}

#[test]
fn rejection_reports_ar_unavailable_without_touching_the_scene() {
    let mut app = ready_app();
    let primary_before = app.world().resource::<SceneRenderer>().primary();

    start_ar(&mut app).expect("start accepted");
    app.world()
        .resource::<ViewerMessageQueue>()
        .push(ViewerMessage::ArSessionRejected {
            reason: "user denied the session".to_string(),
        });
    settle(&mut app, 2);

    let manager = app.world().resource::<XrSessionManager>();
    assert!(!manager.has_live_session());
    assert!(!manager.is_requesting());
    assert_eq!(ar_phase(&app), Some(ArPhase::Idle));
    // The displayed node and its status are untouched by the refusal.
    assert_eq!(app.world().resource::<SceneRenderer>().primary(), primary_before);
}

// A grant that arrives with no request in flight (for example after the
// request was torn down) must not fabricate a session.
#[test]
fn unsolicited_grant_is_ignored() {
    let mut app = ready_app();
    app.world()
        .resource::<ViewerMessageQueue>()
        .push(ViewerMessage::ArSessionGranted);
    settle(&mut app, 2);

    assert!(!app.world().resource::<XrSessionManager>().has_live_session());
    assert_eq!(ar_phase(&app), Some(ArPhase::Idle));
}
