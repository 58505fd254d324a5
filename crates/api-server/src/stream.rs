//! Server-sent events bridge from store subscriptions to HTTP clients.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use std::convert::Infallible;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::rest::AppState;

/// GET /v1/analytics/stream — current snapshot, then one event per update.
/// The store subscription lives as long as the response stream.
///
/// Each client holds only the latest snapshot; a slow reader skips
/// intermediate ones instead of queueing them.
pub async fn stream_snapshots(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, rx) = watch::channel(state.store.snapshot());
    let subscription = state.store.subscribe(move |snapshot| {
        // Receiver gone means the client disconnected; the stream drop
        // removes this callback.
        let _ = tx.send(snapshot);
    });
    debug!(subscribers = state.store.subscriber_count(), "Snapshot stream opened");

    // The subscribe call above always marks the channel changed, so the
    // first event is the snapshot current at connect time.
    let stream = WatchStream::from_changes(rx).filter_map(move |snapshot| {
        let _subscription = &subscription;
        match Event::default().event("snapshot").json_data(snapshot.as_ref()) {
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                warn!(error = %e, "Failed to encode snapshot event");
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
