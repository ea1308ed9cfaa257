use bevy::prelude::*;
use thiserror::Error;

use crate::engine::platform::capability::PlatformCapability;
use crate::engine::viewer::messages::{ViewerMessage, ViewerMessageQueue};

/// Why a start request was refused. `AlreadyActive` and `Unsupported` are
/// decided synchronously and are normal result variants for the caller;
/// `DeniedOrIncompatible` arrives asynchronously from the platform.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StartArError {
    #[error("WebXR immersive-ar is not supported on this platform")]
    Unsupported,
    #[error("an AR session is already active or being requested")]
    AlreadyActive,
    #[error("the platform refused the AR session: {reason}")]
    DeniedOrIncompatible { reason: String },
}

impl StartArError {
    pub fn code(&self) -> &'static str {
        match self {
            StartArError::Unsupported => "unsupported",
            StartArError::AlreadyActive => "already_active",
            StartArError::DeniedOrIncompatible { .. } => "denied_or_incompatible",
        }
    }
}

/// Opaque handle to the one live immersive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XrSessionHandle(u64);

/// Owner of the single session handle per renderer.
#[derive(Resource, Default)]
pub struct XrSessionManager {
    session: Option<XrSessionHandle>,
    request_in_flight: bool,
    granted: u64,
}

impl XrSessionManager {
    /// Synchronous start guard. A live handle or an in-flight request
    /// yields `AlreadyActive` without issuing a second platform request.
    pub fn start(&mut self, capability: Option<&PlatformCapability>) -> Result<(), StartArError> {
        if self.session.is_some() || self.request_in_flight {
            return Err(StartArError::AlreadyActive);
        }
        match capability {
            Some(capability) if capability.webxr_supported => {
                self.request_in_flight = true;
                Ok(())
            }
            _ => Err(StartArError::Unsupported),
        }
    }

    /// The platform granted the in-flight request.
    pub fn bind_granted(&mut self) -> XrSessionHandle {
        self.request_in_flight = false;
        self.granted += 1;
        let handle = XrSessionHandle(self.granted);
        self.session = Some(handle);
        handle
    }

    /// The platform refused the in-flight request.
    pub fn request_rejected(&mut self) {
        self.request_in_flight = false;
    }

    /// Clear the handle; true only for the first call per session, so a
    /// teardown-time double release stays a tolerated no-op.
    pub fn session_ended(&mut self) -> bool {
        self.session.take().is_some()
    }

    pub fn has_live_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_requesting(&self) -> bool {
        self.request_in_flight
    }

    /// Drop both the handle and any in-flight request. Used by unmount;
    /// the platform's own end callback then finds nothing left to clear.
    pub fn reset(&mut self) {
        self.session = None;
        self.request_in_flight = false;
    }
}

/// Start an AR session: synchronous guards first, then the asynchronous
/// platform request whose outcome re-enters through the message queue.
pub fn request_ar_start(
    manager: &mut XrSessionManager,
    capability: Option<&PlatformCapability>,
    queue: &ViewerMessageQueue,
) -> Result<(), StartArError> {
    manager.start(capability)?;
    #[cfg(target_arch = "wasm32")]
    super::web_session::request_immersive_ar(queue.clone());
    #[cfg(not(target_arch = "wasm32"))]
    let _ = queue;
    info!("AR session requested");
    Ok(())
}

/// End the live session if present; a no-op otherwise. The handle itself
/// is cleared by the session-ended message, never here.
pub fn request_ar_stop(manager: &XrSessionManager, queue: &ViewerMessageQueue) {
    if !manager.has_live_session() {
        return;
    }
    #[cfg(target_arch = "wasm32")]
    {
        let _ = queue;
        super::web_session::end_active_session();
    }
    #[cfg(not(target_arch = "wasm32"))]
    queue.push(ViewerMessage::ArSessionEnded);
}
