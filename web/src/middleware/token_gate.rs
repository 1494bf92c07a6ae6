use crate::{AppState, Error};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use log::*;

/// Header carrying the shared secret configured via `AGENT_TOKEN`.
pub(crate) const AGENT_TOKEN_HEADER: &str = "x-agent-token";

/// Shared-secret gate that runs in front of every route.
///
/// With no token configured every request passes. Otherwise the
/// `X-Agent-Token` header must be byte-equal to the configured secret, and
/// anything else is answered with 401 before any handler runs.
pub(crate) async fn require_agent_token(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, Error> {
    let Some(required) = app_state.agent_token() else {
        return Ok(next.run(request).await);
    };

    let rejection = match request.headers().get(AGENT_TOKEN_HEADER) {
        Some(presented) if constant_time_eq(presented.as_bytes(), required.as_bytes()) => None,
        Some(_) => Some("agent token mismatch"),
        None => Some("missing agent token"),
    };

    match rejection {
        None => Ok(next.run(request).await),
        Some(reason) => {
            warn!(
                "Rejecting {} {}: {reason}",
                request.method(),
                request.uri().path()
            );
            Err(Error::unauthorized())
        }
    }
}

// Timing only depends on the length of the inputs, not where they differ.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
