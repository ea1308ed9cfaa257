//! Viewer controller: the per-instance state machine.
//!
//! Every asynchronous completion (capability probe, asset load, session
//! grant/end, bootstrap) re-enters the engine through one ordered message
//! queue and is applied one at a time, so no transition observes another
//! mid-flight.

/// Controller systems and the composing plugin.
pub mod controller;

/// Ordered completion queue shared with the browser callbacks.
pub mod messages;
