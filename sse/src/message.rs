use axum::response::sse::Event;
use std::fmt;

/// One firing of the demo stream's timer, carrying the 1-based tick number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub tick: u32,
}

impl Tick {
    pub fn new(tick: u32) -> Self {
        Self { tick }
    }

    /// JSON payload carried in the frame's `data:` field, e.g. `{"tick": 1}`.
    pub fn payload(&self) -> String {
        format!(r#"{{"tick": {}}}"#, self.tick)
    }

    /// The complete event-stream frame as written on the wire.
    pub fn frame(&self) -> String {
        format!("data: {}\n\n", self.payload())
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "tick {}", self.tick)
    }
}

impl From<Tick> for Event {
    fn from(tick: Tick) -> Self {
        Event::default().data(tick.payload())
    }
}
