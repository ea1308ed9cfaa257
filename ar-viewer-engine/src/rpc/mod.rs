//! JSON-RPC 2.0 surface towards the host page.
//!
//! The engine runs inside an iframe/canvas owned by the surrounding UI.
//! Requests (`start_ar`, `stop_ar`, `get_status`, `unmount`) arrive via
//! `postMessage`; status notifications flow back the same way. Requests
//! carry ids and get responses; notifications are one-way.

/// Bidirectional messaging plugin and the method handlers.
pub mod viewer_rpc;
