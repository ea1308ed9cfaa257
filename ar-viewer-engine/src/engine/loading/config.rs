use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::platform::VIEWER_MANIFEST_PATH;

/// Per-mount viewer configuration.
///
/// The host either inserts this resource directly before the app runs, or
/// the default JSON manifest is fetched and parsed at startup.
#[derive(Asset, TypePath, Resource, Serialize, Deserialize, Clone, Debug)]
pub struct ViewerConfig {
    /// GLB asset shown by the renderer on every non-iOS path.
    pub glb_url: String,
    /// USDZ asset handed to AR Quick Look on iOS. Required there, unused
    /// everywhere else.
    #[serde(default)]
    pub usdz_url: Option<String>,
    #[serde(default)]
    pub title: String,
}

#[derive(Resource, Default)]
pub struct ConfigLoader {
    handle: Option<Handle<ViewerConfig>>,
}

/// Start fetching the manifest unless the host already provided a config.
pub fn start_config_load(
    mut loader: ResMut<ConfigLoader>,
    asset_server: Res<AssetServer>,
    existing: Option<Res<ViewerConfig>>,
) {
    if existing.is_some() {
        return;
    }
    loader.handle = Some(asset_server.load(VIEWER_MANIFEST_PATH));
}

/// Promote the parsed manifest to the live config resource.
pub fn poll_config_load(
    mut loader: ResMut<ConfigLoader>,
    manifests: Res<Assets<ViewerConfig>>,
    mut commands: Commands,
) {
    let Some(handle) = loader.handle.as_ref() else {
        return;
    };
    if let Some(config) = manifests.get(handle) {
        println!("✓ Viewer configuration loaded ({})", config.glb_url);
        commands.insert_resource(config.clone());
        loader.handle = None;
    }
}
