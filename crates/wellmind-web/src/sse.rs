//! Server-Sent Events (SSE) stream of scored and audited results.
//!
//! Each message carries the event kind as its SSE `event:` name and the
//! JSON-encoded [`AppEvent`] as data. `?types=risk_scored,ledger_recorded`
//! limits the stream to the listed kinds.

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_core::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::state::{AppEvent, SharedState};

#[derive(Debug, Default, Deserialize)]
pub struct EventFilter {
    pub types: Option<String>,
}

impl EventFilter {
    fn kinds(&self) -> Option<Vec<String>> {
        self.types.as_ref().map(|t| {
            t.split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect()
        })
    }
}

fn to_sse(event: &AppEvent) -> Option<Event> {
    let data = serde_json::to_string(event).ok()?;
    Some(Event::default().event(event.kind()).data(data))
}

/// GET /api/events
pub async fn sse_handler(
    State(state): State<SharedState>,
    Query(filter): Query<EventFilter>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let kinds = filter.kinds();
    // Lagged receivers skip what they missed.
    let stream = BroadcastStream::new(state.subscribe()).filter_map(move |result| {
        let event = result.ok()?;
        if let Some(kinds) = &kinds {
            if !kinds.iter().any(|k| k == event.kind()) {
                return None;
            }
        }
        to_sse(&event).map(Ok)
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
