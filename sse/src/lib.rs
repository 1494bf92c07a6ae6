//! Server-Sent Events (SSE) primitives for the demo tick stream.
//!
//! # Lifecycle
//!
//! A [`TickStream`] moves through `Idle → Streaming → Closed`:
//!
//! 1. The web handler creates a stream when a client connects (`Idle`).
//! 2. The first poll arms a fixed-period timer (`Streaming`).
//! 3. Every timer firing advances the counter and yields one [`Tick`],
//!    framed on the wire as `data: {"tick": <n>}` followed by a blank line.
//! 4. After the last tick the timer is released and the stream ends
//!    (`Closed(Completed)`).
//! 5. If the client goes away first, hyper drops the response body, which
//!    drops the stream and releases the timer (`Closed(ClientClosed)`).
//!
//! Both exits go through [`TickStream::release`], so the timer handle is
//! released exactly once.
//!
//! # Modules
//!
//! - `message`: the tick payload and its SSE framing
//! - `ticker`: the per-request tick state machine

pub mod message;
pub mod ticker;

pub use message::Tick;
pub use ticker::{CloseReason, State, TickStream, TICK_LIMIT, TICK_PERIOD};
