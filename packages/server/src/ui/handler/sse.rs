//! Server-sent event stream handler.
//!
//! Receive-only. The client submits messages over HTTP. A closed stream is
//! noticed when axum drops the response body, which drops the eviction guard.
//! Streams end on their own once graceful shutdown begins.

use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::{
    domain::TransportAdapter,
    infrastructure::{
        dto::websocket::{connected_payload, event},
        transport::StreamAdapter,
    },
    ui::state::{AppState, ConnectQuery},
    usecase::ConnectEmployeeUseCase,
};

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

pub async fn stream_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, StatusCode> {
    let employee_id = query.employee_id()?;

    let (tx, rx) = mpsc::unbounded_channel();
    let adapter = Arc::new(StreamAdapter::new(tx));

    // `connected` goes out before any presence event
    adapter
        .send(event::CONNECTED, &connected_payload(employee_id))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let connect_usecase = ConnectEmployeeUseCase::new(state.registry.clone());
    let connection = connect_usecase.execute(employee_id, adapter).await;

    let guard = state.registry.eviction_guard(connection.id);
    let stream = UnboundedReceiverStream::new(rx)
        .map(move |frame| {
            let _guard = &guard;
            Ok(Event::default().event(frame.event).data(frame.data))
        })
        .take_until(state.shutdown_started());

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL)))
}
