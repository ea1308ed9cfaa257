use bevy::prelude::*;
use thiserror::Error;

use crate::engine::scene::renderer::{AttachPayload, AttachRequest};

/// Format of a configured 3D asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    Glb,
    Usdz,
}

#[derive(Error, Debug)]
pub enum AssetKindError {
    #[error("unrecognised model extension: {0}")]
    UnknownExtension(String),
}

impl AssetKind {
    pub fn from_url(url: &str) -> Result<Self, AssetKindError> {
        let lowered = url.to_lowercase();
        if lowered.ends_with(".glb") || lowered.ends_with(".gltf") {
            Ok(AssetKind::Glb)
        } else if lowered.ends_with(".usdz") {
            Ok(AssetKind::Usdz)
        } else {
            Err(AssetKindError::UnknownExtension(url.to_string()))
        }
    }
}

/// Source of one load attempt.
#[derive(Clone, Debug)]
pub struct ModelAsset {
    pub url: String,
    pub kind: AssetKind,
}

impl ModelAsset {
    pub fn glb(url: &str) -> Self {
        Self {
            url: url.to_string(),
            kind: AssetKind::Glb,
        }
    }

    /// Infer the kind from the extension, defaulting to GLB for unknown
    /// extensions so a misnamed asset still reaches the fallback path
    /// instead of being silently ignored.
    pub fn from_url(url: &str) -> Self {
        match AssetKind::from_url(url) {
            Ok(kind) => Self {
                url: url.to_string(),
                kind,
            },
            Err(err) => {
                warn!("{err}, treating as GLB");
                Self::glb(url)
            }
        }
    }
}

/// Identifier of one load attempt. Later ids supersede earlier ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadRequestId(u64);

struct ActiveLoad {
    request: LoadRequestId,
    handle: Handle<Scene>,
}

/// Request-id bookkeeping for the single in-flight load per viewer.
///
/// `begin` replaces any pending load; the replaced load's completion can
/// no longer commit because `commit_if_current` only accepts the id held
/// in `active`. `invalidate` marks everything outstanding stale, which is
/// how unmount cancels an in-flight load.
#[derive(Resource, Default)]
pub struct ModelLoader {
    next_request: u64,
    active: Option<ActiveLoad>,
    committed: Option<LoadRequestId>,
}

impl ModelLoader {
    pub fn begin(&mut self, asset: &ModelAsset, asset_server: &AssetServer) -> LoadRequestId {
        let handle = match asset.kind {
            AssetKind::Glb => {
                asset_server.load(GltfAssetLabel::Scene(0).from_asset(asset.url.clone()))
            }
            // USDZ is the AR Quick Look hand-off format; the engine never
            // parses it. Routing it through the asset server lets the
            // normal failure path substitute the fallback primitive.
            AssetKind::Usdz => {
                warn!("USDZ asset routed to the GLB renderer: {}", asset.url);
                asset_server.load(asset.url.clone())
            }
        };
        self.issue(handle)
    }

    /// Allocate the next request id and install the pending load.
    pub fn issue(&mut self, handle: Handle<Scene>) -> LoadRequestId {
        self.next_request += 1;
        let request = LoadRequestId(self.next_request);
        if let Some(superseded) = self.active.replace(ActiveLoad { request, handle }) {
            info!("Load request {:?} superseded", superseded.request);
        }
        request
    }

    /// Commit gate for settled loads: true exactly once, and only for the
    /// most recently issued request. Stale completions get false and must
    /// be discarded by the caller.
    pub fn commit_if_current(&mut self, request: LoadRequestId) -> bool {
        match &self.active {
            Some(active) if active.request == request => {
                self.active = None;
                self.committed = Some(request);
                true
            }
            _ => false,
        }
    }

    /// Mark every outstanding request stale. Used by unmount.
    pub fn invalidate(&mut self) {
        self.active = None;
    }

    pub fn active_scene(&self) -> Option<(LoadRequestId, &Handle<Scene>)> {
        self.active
            .as_ref()
            .map(|active| (active.request, &active.handle))
    }

    pub fn last_committed(&self) -> Option<LoadRequestId> {
        self.committed
    }
}

/// Watch the pending load and emit the attach request when it settles.
///
/// Chained directly before the attach system, so a settled load is either
/// committed or discarded in the same frame it is observed.
pub fn poll_active_load(
    loader: Res<ModelLoader>,
    asset_server: Res<AssetServer>,
    mut attach: EventWriter<AttachRequest>,
) {
    let Some((request, handle)) = loader.active_scene() else {
        return;
    };
    match asset_server.get_load_state(handle) {
        Some(bevy::asset::LoadState::Loaded) => {
            attach.write(AttachRequest {
                request,
                payload: AttachPayload::ParsedScene(handle.clone()),
            });
        }
        Some(bevy::asset::LoadState::Failed(err)) => {
            warn!("Model load failed: {err}");
            attach.write(AttachRequest {
                request,
                payload: AttachPayload::FallbackCube,
            });
        }
        _ => {}
    }
}
