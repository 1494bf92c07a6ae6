//! SSE HTTP handler for the web layer.
//!
//! Only the Axum handler lives here. The tick state machine and frame format
//! live in the `sse` crate.

pub(crate) mod handler;
