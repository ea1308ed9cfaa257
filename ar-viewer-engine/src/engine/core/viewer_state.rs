use bevy::prelude::*;

/// Lifecycle of one viewer instance.
///
/// Construction is the `DetectingPlatform` entry; `Unmounted` is terminal
/// and every later command is a no-op.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum ViewerState {
    #[default]
    DetectingPlatform,
    /// iOS agent: the USDZ hand-off is published and no renderer exists.
    IosHandoffReady,
    /// Renderer and loader are being constructed, load about to start.
    PreparingScene,
    SceneReady,
    Unmounted,
}

impl ViewerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewerState::DetectingPlatform => "detecting_platform",
            ViewerState::IosHandoffReady => "ios_handoff_ready",
            ViewerState::PreparingScene => "preparing_scene",
            ViewerState::SceneReady => "scene_ready",
            ViewerState::Unmounted => "unmounted",
        }
    }
}

/// AR sub-phase of `SceneReady`: idle preview or a live immersive session.
#[derive(SubStates, Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
#[source(ViewerState = ViewerState::SceneReady)]
pub enum ArPhase {
    #[default]
    Idle,
    Active,
}

impl ArPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArPhase::Idle => "idle",
            ArPhase::Active => "active",
        }
    }
}
