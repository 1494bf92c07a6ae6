use ::sse::TickStream;
use axum::http::header;
use axum::response::sse::{Event, Sse};
use axum::response::IntoResponse;
use futures::{Stream, StreamExt};
use log::*;
use std::convert::Infallible;

/// Demo SSE stream: writes `data: {"tick": n}` for n = 1..=3, one frame per
/// second, then ends the response.
///
/// No keep-alive comments are injected, so the body carries exactly the tick
/// frames. If the client disconnects early hyper drops the body, which drops
/// the `TickStream` and stops its timer.
#[utoipa::path(
    get,
    path = "/api/stream/test",
    responses(
        (status = 200, description = "Three tick frames, one per second, then the stream closes", body = String, content_type = "text/event-stream"),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("agent_token" = [])
    )
)]
pub(crate) async fn stream_test() -> impl IntoResponse {
    debug!("Opening demo tick stream");

    let events = tick_events(TickStream::demo());

    ([(header::CONNECTION, "keep-alive")], Sse::new(events))
}

fn tick_events(ticker: TickStream) -> impl Stream<Item = Result<Event, Infallible>> {
    ticker
        .into_stream()
        .map(|tick| Ok::<Event, Infallible>(Event::from(tick)))
}
