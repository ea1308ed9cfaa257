#![allow(dead_code)]
//! Headless harness driving the viewer core without a window or GPU.
//!
//! The injectable probe stands in for the browser agent, and asynchronous
//! completions are pushed straight onto the viewer message queue.

use std::sync::Arc;
use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use ar_viewer_engine::engine::platform::capability::InjectableProbe;
use ar_viewer_engine::engine::viewer::controller::ArViewerPlugin;
use ar_viewer_engine::{ViewerConfig, ViewerState};

pub const IPHONE_UA: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15";
pub const ANDROID_UA: &str =
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Chrome/125.0 Mobile Safari/537.36";

pub fn test_config(glb_url: &str) -> ViewerConfig {
    ViewerConfig {
        glb_url: glb_url.to_string(),
        usdz_url: Some("models/burger.usdz".to_string()),
        title: "Test model".to_string(),
    }
}

/// Build a headless viewer app with a fixed probe answer and an optional
/// pre-injected configuration.
pub fn viewer_app(user_agent: &str, webxr_supported: bool, config: Option<ViewerConfig>) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin, AssetPlugin::default()));
    app.init_asset::<Mesh>();
    app.init_asset::<StandardMaterial>();
    app.init_asset::<Scene>();
    if let Some(config) = config {
        app.insert_resource(config);
    }
    app.add_plugins(ArViewerPlugin::new(Arc::new(InjectableProbe {
        user_agent: Some(user_agent.to_string()),
        webxr_supported,
    })));
    app
}

pub fn settle(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

/// Update until the predicate holds, allowing background asset IO to make
/// progress between frames. Panics if it never does.
pub fn settle_until(app: &mut App, what: &str, mut predicate: impl FnMut(&mut App) -> bool) {
    for _ in 0..500 {
        app.update();
        if predicate(app) {
            return;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    panic!("viewer never settled: {what}");
}

pub fn current_state(app: &App) -> ViewerState {
    *app.world().resource::<State<ViewerState>>().get()
}
