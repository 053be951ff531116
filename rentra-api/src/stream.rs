use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures_util::{Stream, StreamExt};
use rentra_shared::UserId;
use serde_json::json;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/users/{user_id}/bookings/stream", get(stream_bookings))
}

/// Push channel for reservation changes: each event is a full snapshot of
/// the user's bookings, never an incremental patch. Consumers replace their
/// whole view with the newest snapshot; a lagged receiver just skips ahead,
/// keeping whatever it rendered last in the meantime.
async fn stream_bookings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.store.subscribe();
    let user = UserId::new(user_id);

    let stream = BroadcastStream::new(rx).filter_map(move |result| {
        let user = user.clone();
        async move {
            match result {
                Ok(snapshot) => {
                    let bookings = snapshot.for_user(&user);
                    let payload = json!({
                        "seq": snapshot.seq,
                        "bookings": bookings,
                    });
                    Some(Ok::<_, Infallible>(
                        Event::default()
                            .event("snapshot")
                            .data(payload.to_string()),
                    ))
                }
                // Lagged: drop the gap, the next snapshot carries full state.
                Err(_) => None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
