use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::core::viewer_state::{ArPhase, ViewerState};
use crate::engine::loading::config::ViewerConfig;
use crate::engine::loading::progress::LoadProgress;
use crate::engine::platform::capability::PlatformCapability;
use crate::engine::viewer::controller::UnmountRequested;
use crate::engine::viewer::messages::ViewerMessageQueue;
use crate::engine::xr::session_manager::{XrSessionManager, request_ar_start, request_ar_stop};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification for one-way status updates.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "Method not found".to_string(),
            data: Some(serde_json::json!({ "method": method })),
        }
    }
}

/// Outgoing side of the host-page channel. Notifications drain before
/// responses to keep status updates ahead of their acknowledgements.
#[derive(Resource, Default)]
pub struct ViewerRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl ViewerRpcInterface {
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Incoming raw-message queue. The wasm listener pushes `postMessage`
/// payloads; the test harness pushes strings directly.
#[derive(Resource, Clone, Default)]
pub struct RpcInbox(Arc<Mutex<Vec<String>>>);

impl RpcInbox {
    pub fn push(&self, raw: impl Into<String>) {
        if let Ok(mut inbox) = self.0.lock() {
            inbox.push(raw.into());
        }
    }

    fn drain(&self) -> Vec<String> {
        match self.0.lock() {
            Ok(mut inbox) => std::mem::take(&mut *inbox),
            Err(_) => Vec::new(),
        }
    }
}

#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

/// Host-page communication layer for the embedded viewer.
pub struct ViewerRpcPlugin;

impl Plugin for ViewerRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewerRpcInterface>()
            .init_resource::<RpcInbox>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(inbox: Res<RpcInbox>) {
    use web_sys::{MessageEvent, window};

    let listener_inbox = inbox.clone();
    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message: String = data.into();
            // Cheap shape check before queuing; full parsing happens on
            // the engine side of the frame boundary.
            if message.contains("jsonrpc") {
                listener_inbox.push(message);
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        window
            .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            .expect("Failed to register message listener");
    }

    // Ownership transfers to the JS event target.
    closure.forget();
}

fn process_incoming_messages(inbox: Res<RpcInbox>, mut events: EventWriter<IncomingRpcMessage>) {
    for content in inbox.drain() {
        events.write(IncomingRpcMessage { content });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc: ResMut<ViewerRpcInterface>,
    mut manager: ResMut<XrSessionManager>,
    capability: Option<Res<PlatformCapability>>,
    progress: Res<LoadProgress>,
    config: Option<Res<ViewerConfig>>,
    viewer_state: Res<State<ViewerState>>,
    ar_phase: Option<Res<State<ArPhase>>>,
    queue: Res<ViewerMessageQueue>,
    mut unmount: EventWriter<UnmountRequested>,
) {
    for event in events.read() {
        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("Unparseable RPC message: {parse_error}");
                continue;
            }
        };

        // Notifications have no id and get no response.
        let Some(id) = request.id.clone() else {
            continue;
        };

        let result = match request.method.as_str() {
            "start_ar" => handle_start_ar(
                &mut manager,
                capability.as_deref(),
                &queue,
                viewer_state.get(),
            ),
            "stop_ar" => handle_stop_ar(&manager, &queue),
            "get_status" => Ok(status_payload(
                viewer_state.get(),
                ar_phase.as_deref(),
                capability.as_deref(),
                &progress,
                config.as_deref(),
            )),
            "unmount" => {
                unmount.write(UnmountRequested);
                Ok(serde_json::json!({ "unmounting": true }))
            }
            method => {
                warn!("Unknown RPC method: {method}");
                Err(RpcError::method_not_found(method))
            }
        };

        let response = match result {
            Ok(value) => RpcResponse {
                jsonrpc: "2.0".to_string(),
                result: Some(value),
                error: None,
                id: Some(id),
            },
            Err(error) => RpcResponse {
                jsonrpc: "2.0".to_string(),
                result: None,
                error: Some(error),
                id: Some(id),
            },
        };
        rpc.queue_response(response);
    }
}

/// `AlreadyActive` and `Unsupported` are normal result payloads, not RPC
/// errors; the platform's own refusal arrives later as a notification.
fn handle_start_ar(
    manager: &mut XrSessionManager,
    capability: Option<&PlatformCapability>,
    queue: &ViewerMessageQueue,
    viewer_state: &ViewerState,
) -> Result<serde_json::Value, RpcError> {
    if viewer_state != &ViewerState::SceneReady {
        return Ok(serde_json::json!({ "accepted": false, "reason": "not_ready" }));
    }
    match request_ar_start(manager, capability, queue) {
        Ok(()) => Ok(serde_json::json!({ "accepted": true })),
        Err(refused) => Ok(serde_json::json!({ "accepted": false, "reason": refused.code() })),
    }
}

fn handle_stop_ar(
    manager: &XrSessionManager,
    queue: &ViewerMessageQueue,
) -> Result<serde_json::Value, RpcError> {
    let was_live = manager.has_live_session();
    request_ar_stop(manager, queue);
    Ok(serde_json::json!({ "stopped": was_live }))
}

fn status_payload(
    viewer_state: &ViewerState,
    ar_phase: Option<&State<ArPhase>>,
    capability: Option<&PlatformCapability>,
    progress: &LoadProgress,
    config: Option<&ViewerConfig>,
) -> serde_json::Value {
    serde_json::json!({
        "state": viewer_state.as_str(),
        "ar_phase": ar_phase.map(|phase| phase.get().as_str()),
        "load_status": progress.status.as_str(),
        "platform": capability.map(|capability| serde_json::json!({
            "is_ios": capability.is_ios,
            "webxr_supported": capability.webxr_supported,
        })),
        "title": config.map(|config| config.title.clone()),
    })
}

/// Drain queued notifications, then responses, towards the parent window.
fn send_outgoing_messages(mut rpc: ResMut<ViewerRpcInterface>) {
    for notification in rpc.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }
    for response in rpc.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(parent) = web_sys::window().and_then(|w| w.parent().ok().flatten()) {
                    if let Err(err) = parent.post_message(&JsValue::from_str(&json), "*") {
                        error!("Failed to send message to parent: {err:?}");
                    }
                } else {
                    warn!("No parent window available for message transmission");
                }
            }
            Err(err) => {
                error!("Failed to serialize message: {err}");
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // Native preview has no parent page.
        let _ = message;
    }
}
