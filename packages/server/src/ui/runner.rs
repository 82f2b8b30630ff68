//! Router construction and server lifecycle.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::infrastructure::{registry::EvictionReceiver, repository::InMemoryChatStore};

use super::{
    config::ServerArgs,
    error::ServerError,
    eviction::run_eviction_loop,
    handler::{
        chat_messages, connection_snapshot, health_check, list_chats, post_direct_message,
        post_room_message, raw_websocket_handler, stream_handler, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Build the router.
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/ws/raw", get(raw_websocket_handler))
        .route("/api/chat/stream", get(stream_handler))
        .route("/api/health", get(health_check))
        .route("/api/chats", get(list_chats))
        .route(
            "/api/chats/{chat_id}/messages",
            get(chat_messages).post(post_room_message),
        )
        .route(
            "/api/chats/direct/{employee_id}/messages",
            post(post_direct_message),
        )
        .route("/api/connections", get(connection_snapshot))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on `listener` until `shutdown` resolves, with the eviction loop running alongside.
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    evictions: EvictionReceiver,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let eviction_task = tokio::spawn(run_eviction_loop(state.clone(), evictions));

    let app = create_app(state.clone());
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            tracing::info!("shutdown signal received, closing event streams");
            state.shutdown.send_replace(true);
        })
        .await;

    eviction_task.abort();
    result?;
    tracing::info!("server stopped");
    Ok(())
}

/// Run the server with the in-memory chat store.
pub async fn run(args: ServerArgs) -> Result<(), ServerError> {
    let store = if args.no_demo_seed {
        InMemoryChatStore::new()
    } else {
        InMemoryChatStore::demo()?
    };
    let store = Arc::new(store);
    let (state, evictions) = AppState::new(store.clone(), store, args.write_timeout());

    let listener = TcpListener::bind(args.address()).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        write_timeout_ms = args.write_timeout_ms,
        "staffchat server listening"
    );

    serve(listener, state, evictions, shutdown_signal()).await
}
