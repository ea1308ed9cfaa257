use bevy::prelude::*;

use crate::engine::loading::model_loader::LoadRequestId;
use crate::rpc::viewer_rpc::ViewerRpcInterface;

/// Lifecycle of the current load attempt. Exactly one is current per viewer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading(LoadRequestId),
    Loaded,
    Error,
}

impl LoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadStatus::Idle => "idle",
            LoadStatus::Loading(_) => "loading",
            LoadStatus::Loaded => "loaded",
            LoadStatus::Error => "error",
        }
    }
}

#[derive(Resource, Default)]
pub struct LoadProgress {
    pub status: LoadStatus,
}

/// Push a `load_status_changed` notification whenever the status moves.
pub fn notify_load_status(
    progress: Res<LoadProgress>,
    mut rpc: ResMut<ViewerRpcInterface>,
    mut last_sent: Local<Option<LoadStatus>>,
) {
    if *last_sent == Some(progress.status) {
        return;
    }
    *last_sent = Some(progress.status);
    rpc.send_notification(
        "load_status_changed",
        serde_json::json!({ "load_status": progress.status.as_str() }),
    );
}
