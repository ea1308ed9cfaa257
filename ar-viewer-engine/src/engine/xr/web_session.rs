use std::cell::{Cell, RefCell};

use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::window;

use crate::constants::platform::{IMMERSIVE_AR_MODE, XR_OPTIONAL_FEATURES, XR_REQUIRED_FEATURES};
use crate::engine::viewer::messages::{ViewerMessage, ViewerMessageQueue};

thread_local! {
    // The raw XRSession object. Kept out of the ECS because it is not
    // Send; the manager only ever sees the opaque handle.
    static ACTIVE_SESSION: RefCell<Option<JsValue>> = const { RefCell::new(None) };
    // Set at unmount so a grant racing the teardown ends itself.
    static VIEWER_GONE: Cell<bool> = const { Cell::new(false) };
}

/// `navigator.xr`, reached through reflection so its absence is an
/// ordinary `None` rather than an exception.
fn xr_system() -> Option<JsValue> {
    let navigator = window()?.navigator();
    let xr = Reflect::get(navigator.as_ref(), &JsValue::from_str("xr")).ok()?;
    if xr.is_undefined() || xr.is_null() {
        None
    } else {
        Some(xr)
    }
}

fn xr_method(xr: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(xr, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

/// One-time `isSessionSupported("immersive-ar")` query. Every exit path
/// resolves onto the queue; a missing API or a rejected promise is `false`.
pub fn probe_immersive_ar(queue: ViewerMessageQueue) {
    wasm_bindgen_futures::spawn_local(async move {
        let supported = match xr_system() {
            None => false,
            Some(xr) => match xr_method(&xr, "isSessionSupported")
                .and_then(|f| f.call1(&xr, &JsValue::from_str(IMMERSIVE_AR_MODE)).ok())
                .and_then(|v| v.dyn_into::<Promise>().ok())
            {
                None => false,
                Some(promise) => JsFuture::from(promise)
                    .await
                    .map(|answer| answer.as_bool().unwrap_or(false))
                    .unwrap_or(false),
            },
        };
        queue.push(ViewerMessage::WebXrProbeResolved(supported));
    });
}

fn feature_array(features: &[&str]) -> Array {
    features.iter().map(|f| JsValue::from_str(f)).collect()
}

fn session_options() -> Object {
    let options = Object::new();
    let _ = Reflect::set(
        &options,
        &JsValue::from_str("requiredFeatures"),
        &feature_array(XR_REQUIRED_FEATURES),
    );
    let _ = Reflect::set(
        &options,
        &JsValue::from_str("optionalFeatures"),
        &feature_array(XR_OPTIONAL_FEATURES),
    );
    if let Some(body) = window().and_then(|w| w.document()).and_then(|d| d.body()) {
        let overlay = Object::new();
        let _ = Reflect::set(&overlay, &JsValue::from_str("root"), body.as_ref());
        let _ = Reflect::set(&options, &JsValue::from_str("domOverlay"), &overlay);
    }
    options
}

/// Request the immersive session. Grant, rejection, and the later session
/// end all re-enter the engine through the message queue.
pub fn request_immersive_ar(queue: ViewerMessageQueue) {
    wasm_bindgen_futures::spawn_local(async move {
        let Some(xr) = xr_system() else {
            queue.push(ViewerMessage::ArSessionRejected {
                reason: "WebXR is not available".to_string(),
            });
            return;
        };
        let Some(promise) = xr_method(&xr, "requestSession")
            .and_then(|f| {
                f.call2(
                    &xr,
                    &JsValue::from_str(IMMERSIVE_AR_MODE),
                    session_options().as_ref(),
                )
                .ok()
            })
            .and_then(|v| v.dyn_into::<Promise>().ok())
        else {
            queue.push(ViewerMessage::ArSessionRejected {
                reason: "requestSession is not callable".to_string(),
            });
            return;
        };
        match JsFuture::from(promise).await {
            Ok(session) => {
                if VIEWER_GONE.with(|gone| gone.get()) {
                    end_session_object(&session);
                    return;
                }
                register_end_listener(&session, queue.clone());
                ACTIVE_SESSION.with(|active| *active.borrow_mut() = Some(session));
                queue.push(ViewerMessage::ArSessionGranted);
            }
            Err(err) => {
                queue.push(ViewerMessage::ArSessionRejected {
                    reason: format!("{err:?}"),
                });
            }
        }
    });
}

fn register_end_listener(session: &JsValue, queue: ViewerMessageQueue) {
    let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        queue.push(ViewerMessage::ArSessionEnded);
    }) as Box<dyn FnMut(web_sys::Event)>);
    let target: &web_sys::EventTarget = session.unchecked_ref();
    if target
        .add_event_listener_with_callback("end", closure.as_ref().unchecked_ref())
        .is_err()
    {
        web_sys::console::warn_1(&JsValue::from_str("failed to observe XR session end"));
    }
    // Ownership moves to the JS side for the lifetime of the session.
    closure.forget();
}

fn end_session_object(session: &JsValue) {
    if let Some(end) = xr_method(session, "end") {
        let _ = end.call0(session);
    }
}

/// End the stored session, if any. The `end` event listener delivers the
/// session-ended message afterwards.
pub fn end_active_session() {
    if let Some(session) = ACTIVE_SESSION.with(|active| active.borrow_mut().take()) {
        end_session_object(&session);
    }
}

/// Teardown marker: end the live session and make any in-flight grant end
/// itself on arrival.
pub fn mark_viewer_gone() {
    VIEWER_GONE.with(|gone| gone.set(true));
    end_active_session();
}
