//! Process-wide bootstrap for the shared viewer companion assets.
//!
//! The overlay script and stylesheet live in the host document, which is
//! shared by every viewer instance on the page. They are injected once,
//! refcounted per mount, and removed when the last viewer unmounts —
//! never per instance.

use std::sync::Mutex;

use bevy::prelude::*;

use crate::engine::viewer::messages::{ViewerMessage, ViewerMessageQueue};

struct BootstrapState {
    mounts: usize,
}

static BOOTSTRAP: Mutex<BootstrapState> = Mutex::new(BootstrapState { mounts: 0 });

/// One viewer's share of the document bootstrap. Dropping it releases the
/// reference; the last drop removes the injected nodes.
pub struct BootstrapGuard {
    _private: (),
}

/// Resource slot holding this instance's guard until unmount.
#[derive(Resource, Default)]
pub struct BootstrapSlot(pub Option<BootstrapGuard>);

/// Take a reference on the shared bootstrap, injecting the companion
/// assets if this is the first mount in the process.
pub fn acquire(queue: &ViewerMessageQueue) -> BootstrapGuard {
    let mut state = BOOTSTRAP.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    state.mounts += 1;
    if state.mounts == 1 {
        inject(queue);
    } else {
        // Assets are already in the document from an earlier mount.
        queue.push(ViewerMessage::BootstrapReady);
    }
    BootstrapGuard { _private: () }
}

impl Drop for BootstrapGuard {
    fn drop(&mut self) {
        let mut state = BOOTSTRAP.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.mounts = state.mounts.saturating_sub(1);
        if state.mounts == 0 {
            remove();
        }
    }
}

/// Startup system storing the guard for this instance.
pub fn acquire_bootstrap(queue: Res<ViewerMessageQueue>, mut slot: ResMut<BootstrapSlot>) {
    slot.0 = Some(acquire(&queue));
}

#[cfg(target_arch = "wasm32")]
fn inject(queue: &ViewerMessageQueue) {
    use wasm_bindgen::prelude::*;

    use crate::constants::platform::{
        BOOTSTRAP_SCRIPT_ELEMENT_ID, BOOTSTRAP_SCRIPT_URL, BOOTSTRAP_STYLE_ELEMENT_ID,
        BOOTSTRAP_STYLE_URL,
    };

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        queue.push(ViewerMessage::BootstrapReady);
        return;
    };
    let Some(head) = document.head() else {
        queue.push(ViewerMessage::BootstrapReady);
        return;
    };

    if let Ok(style) = document.create_element("link") {
        let _ = style.set_attribute("id", BOOTSTRAP_STYLE_ELEMENT_ID);
        let _ = style.set_attribute("rel", "stylesheet");
        let _ = style.set_attribute("href", BOOTSTRAP_STYLE_URL);
        let _ = head.append_child(&style);
    }

    if let Ok(script) = document.create_element("script") {
        let _ = script.set_attribute("id", BOOTSTRAP_SCRIPT_ELEMENT_ID);
        let _ = script.set_attribute("type", "module");
        let _ = script.set_attribute("src", BOOTSTRAP_SCRIPT_URL);
        let loaded_queue = queue.clone();
        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            loaded_queue.push(ViewerMessage::BootstrapReady);
        }) as Box<dyn FnMut(web_sys::Event)>);
        let _ = script.add_event_listener_with_callback("load", closure.as_ref().unchecked_ref());
        closure.forget();
        let _ = head.append_child(&script);
    } else {
        queue.push(ViewerMessage::BootstrapReady);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn inject(queue: &ViewerMessageQueue) {
    // No document on native builds; the bootstrap is trivially ready.
    queue.push(ViewerMessage::BootstrapReady);
}

#[cfg(target_arch = "wasm32")]
fn remove() {
    use crate::constants::platform::{BOOTSTRAP_SCRIPT_ELEMENT_ID, BOOTSTRAP_STYLE_ELEMENT_ID};

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    for id in [BOOTSTRAP_SCRIPT_ELEMENT_ID, BOOTSTRAP_STYLE_ELEMENT_ID] {
        if let Some(element) = document.get_element_by_id(id) {
            element.remove();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn remove() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refcount_survives_nested_mounts() {
        let queue = ViewerMessageQueue::default();

        let first = acquire(&queue);
        assert_eq!(queue.drain(), vec![ViewerMessage::BootstrapReady]);

        // Second mount reuses the injected assets.
        let second = acquire(&queue);
        assert_eq!(queue.drain(), vec![ViewerMessage::BootstrapReady]);

        drop(first);
        let third = acquire(&queue);
        assert_eq!(queue.drain(), vec![ViewerMessage::BootstrapReady]);
        drop(second);
        drop(third);

        // A fresh mount after the last release injects again.
        let again = acquire(&queue);
        assert_eq!(queue.drain(), vec![ViewerMessage::BootstrapReady]);
        drop(again);
    }
}
