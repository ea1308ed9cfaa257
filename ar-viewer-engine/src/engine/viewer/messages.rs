use std::sync::{Arc, Mutex};

use bevy::prelude::*;

/// Completion delivered by an asynchronous browser callback or future.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewerMessage {
    /// Answer of the one-time `immersive-ar` support probe.
    WebXrProbeResolved(bool),
    /// The shared bootstrap script finished loading.
    BootstrapReady,
    /// The platform granted the requested AR session.
    ArSessionGranted,
    /// The platform refused the session request (user denial or
    /// incompatible device).
    ArSessionRejected { reason: String },
    /// The live session ended, by `stop`, user action, or the platform.
    ArSessionEnded,
}

/// Thread-safe completion queue. Browser closures hold a clone and push;
/// the controller drains once per frame, preserving arrival order.
#[derive(Resource, Clone, Default)]
pub struct ViewerMessageQueue(Arc<Mutex<Vec<ViewerMessage>>>);

impl ViewerMessageQueue {
    pub fn push(&self, message: ViewerMessage) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push(message);
        }
    }

    pub fn drain(&self) -> Vec<ViewerMessage> {
        match self.0.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(_) => Vec::new(),
        }
    }
}

/// A queued message re-entering the engine as a Bevy event.
#[derive(Event, Clone, Debug)]
pub struct ViewerEvent(pub ViewerMessage);

/// Drain the shared queue into the event stream, one frame at a time.
pub fn pump_viewer_messages(
    queue: Res<ViewerMessageQueue>,
    mut events: EventWriter<ViewerEvent>,
) {
    for message in queue.drain() {
        events.write(ViewerEvent(message));
    }
}
