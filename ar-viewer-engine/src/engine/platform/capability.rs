use bevy::prelude::*;

use crate::constants::platform::{IOS_DEVICE_TOKENS, MOBILE_DEVICE_TOKENS};
use crate::engine::viewer::messages::{ViewerMessage, ViewerMessageQueue};

/// Platform flags committed once per viewer mount, immutable thereafter.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlatformCapability {
    pub is_ios: bool,
    pub webxr_supported: bool,
}

/// Coarse agent classification reported to the host page alongside the
/// capability, so it can render its "AR (Mobile Only)" affordance.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct AgentClassification {
    pub is_mobile: bool,
}

/// Source of the two capability inputs: the synchronous user-agent string
/// and the asynchronous WebXR support answer.
///
/// The WebXR probe never resolves in place; it pushes a
/// [`ViewerMessage::WebXrProbeResolved`] onto the viewer queue so the
/// commit happens on the ordered message path like every other completion.
pub trait CapabilityProbe: Send + Sync {
    fn user_agent(&self) -> Option<String>;
    fn probe_webxr(&self, queue: &ViewerMessageQueue);
}

/// Probe answering from fixed values. Used by the test harness and as the
/// native preview default, where no browser agent exists.
#[derive(Clone, Debug, Default)]
pub struct InjectableProbe {
    pub user_agent: Option<String>,
    pub webxr_supported: bool,
}

impl InjectableProbe {
    /// Probe for a runtime with neither an agent string nor WebXR.
    pub fn unsupported() -> Self {
        Self::default()
    }
}

impl CapabilityProbe for InjectableProbe {
    fn user_agent(&self) -> Option<String> {
        self.user_agent.clone()
    }

    fn probe_webxr(&self, queue: &ViewerMessageQueue) {
        queue.push(ViewerMessage::WebXrProbeResolved(self.webxr_supported));
    }
}

/// Probe reading the live browser agent and querying
/// `navigator.xr.isSessionSupported("immersive-ar")`. Absence of the XR
/// system yields `false` rather than an error.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Debug, Default)]
pub struct RuntimeUserAgentProbe;

#[cfg(target_arch = "wasm32")]
impl CapabilityProbe for RuntimeUserAgentProbe {
    fn user_agent(&self) -> Option<String> {
        web_sys::window().map(|window| window.navigator().user_agent().unwrap_or_default())
    }

    fn probe_webxr(&self, queue: &ViewerMessageQueue) {
        crate::engine::xr::web_session::probe_immersive_ar(queue.clone());
    }
}

/// Match the lowercased agent string against the iOS device token set.
pub fn is_ios_user_agent(agent: &str) -> bool {
    let agent = agent.to_lowercase();
    IOS_DEVICE_TOKENS.iter().any(|token| agent.contains(token))
}

pub fn is_mobile_user_agent(agent: &str) -> bool {
    let agent = agent.to_lowercase();
    MOBILE_DEVICE_TOKENS
        .iter()
        .any(|token| agent.contains(token))
}
