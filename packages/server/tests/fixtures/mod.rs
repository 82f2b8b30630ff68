//! Test fixtures for integration tests.
//!
//! Starts the real router on an ephemeral port and provides small clients
//! for the three transports.

#![allow(dead_code)]

use std::{collections::VecDeque, net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use staffchat_server::{
    infrastructure::repository::InMemoryChatStore,
    ui::{serve, state::AppState},
};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
    task::JoinHandle,
    time::{Instant, timeout, timeout_at},
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

/// Upper bound for any single expected frame
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// How long to listen for frames that must not arrive
pub const QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Test server running in-process with the demo roster
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_until(std::future::pending()).await
    }

    /// Start a server that shuts down gracefully once the returned sender fires.
    pub async fn start_with_shutdown() -> (Self, oneshot::Sender<()>) {
        let (trigger, signal) = oneshot::channel::<()>();
        let server = Self::start_until(async move {
            let _ = signal.await;
        })
        .await;
        (server, trigger)
    }

    async fn start_until<F>(shutdown: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let store = Arc::new(InMemoryChatStore::demo().expect("Failed to seed store"));
        let (state, evictions) = AppState::new(store.clone(), store, Duration::from_secs(2));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to read local address");

        let handle = tokio::spawn(async move {
            serve(listener, state, evictions, shutdown)
                .await
                .expect("Server failed");
        });

        Self { addr, handle }
    }

    /// Whether the server task finished within `period`.
    pub async fn stopped_within(&mut self, period: Duration) -> bool {
        timeout(period, &mut self.handle).await.is_ok()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self, path: &str) -> String {
        format!("ws://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Debug, Clone, Copy)]
enum Framing {
    /// `{"event", "data", "ack"?}`
    Duplex,
    /// `{"type", ...}`
    Raw,
}

impl Framing {
    fn name(self, frame: &Value) -> Option<&str> {
        match self {
            Self::Duplex => frame["event"].as_str(),
            Self::Raw => frame["type"].as_str(),
        }
    }

    fn payload(self, frame: &Value) -> Value {
        match self {
            Self::Duplex => frame["data"].clone(),
            Self::Raw => frame.clone(),
        }
    }
}

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Duplex or raw socket client. Frames read while waiting for something
/// else are kept and examined first by later calls.
pub struct SocketClient {
    socket: Socket,
    framing: Framing,
    pending: VecDeque<Value>,
    next_ack: u64,
}

impl SocketClient {
    pub async fn duplex(server: &TestServer, employee_id: i64) -> Self {
        Self::connect(server, "/ws", employee_id, Framing::Duplex).await
    }

    pub async fn raw(server: &TestServer, employee_id: i64) -> Self {
        Self::connect(server, "/ws/raw", employee_id, Framing::Raw).await
    }

    async fn connect(server: &TestServer, path: &str, employee_id: i64, framing: Framing) -> Self {
        let url = server.ws_url(&format!("{path}?employeeId={employee_id}"));
        let (socket, _) = connect_async(url).await.expect("Failed to connect");
        let mut client = Self {
            socket,
            framing,
            pending: VecDeque::new(),
            next_ack: 0,
        };
        // 自分の online 通知が届けば登録済み
        client.wait_for_presence("staff:online", employee_id).await;
        client
    }

    /// Send a raw text frame.
    pub async fn send_text(&mut self, text: &str) {
        self.socket
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("Failed to send frame");
    }

    /// Send an event and wait for its acknowledgement payload.
    pub async fn request(&mut self, event: &str, data: Value) -> Value {
        match self.framing {
            Framing::Duplex => {
                self.next_ack += 1;
                let ack = self.next_ack;
                let frame = json!({ "event": event, "data": data, "ack": ack });
                self.send_text(&frame.to_string()).await;
                let reply = self
                    .take(|frame| frame["event"] == "ack" && frame["ack"] == ack)
                    .await;
                reply["data"].clone()
            }
            Framing::Raw => {
                let mut frame = data;
                frame["type"] = json!(event);
                self.send_text(&frame.to_string()).await;
                self.take(|frame| frame["type"] == "ack").await
            }
        }
    }

    /// Wait for the next `event` and return its payload.
    pub async fn wait_for(&mut self, event: &str) -> Value {
        let framing = self.framing;
        let frame = self
            .take(|frame| framing.name(frame) == Some(event))
            .await;
        framing.payload(&frame)
    }

    pub async fn wait_for_presence(&mut self, event: &str, employee_id: i64) -> Value {
        let framing = self.framing;
        let frame = self
            .take(|frame| {
                framing.name(frame) == Some(event)
                    && framing.payload(frame)["employee_id"] == employee_id
            })
            .await;
        framing.payload(&frame)
    }

    /// Count `event` frames already buffered or arriving within `period`.
    pub async fn count_within(&mut self, event: &str, period: Duration) -> usize {
        let framing = self.framing;
        let before = self.pending.len();
        self.pending
            .retain(|frame| framing.name(frame) != Some(event));
        let mut count = before - self.pending.len();

        let deadline = Instant::now() + period;
        while let Ok(Some(frame)) = timeout_at(deadline, self.read_frame()).await {
            if framing.name(&frame) == Some(event) {
                count += 1;
            } else {
                self.pending.push_back(frame);
            }
        }
        count
    }

    pub async fn close(mut self) {
        self.socket.close(None).await.expect("Failed to close");
    }

    async fn take(&mut self, matches: impl Fn(&Value) -> bool) -> Value {
        if let Some(index) = self.pending.iter().position(&matches) {
            return self.pending.remove(index).expect("index is in range");
        }
        loop {
            let frame = timeout(RECV_TIMEOUT, self.read_frame())
                .await
                .expect("Timed out waiting for frame")
                .expect("Socket closed");
            if matches(&frame) {
                return frame;
            }
            self.pending.push_back(frame);
        }
    }

    /// Next JSON text frame, or `None` once the socket is closed.
    async fn read_frame(&mut self) -> Option<Value> {
        loop {
            match self.socket.next().await? {
                Ok(Message::Text(text)) => {
                    return Some(serde_json::from_str(text.as_str()).expect("Frame is not JSON"));
                }
                Ok(Message::Close(_)) | Err(_) => return None,
                Ok(_) => continue,
            }
        }
    }
}

/// Server-sent event stream client
pub struct SseClient {
    response: reqwest::Response,
    buffer: String,
    pending: VecDeque<(String, Value)>,
}

impl SseClient {
    pub async fn connect(server: &TestServer, employee_id: i64) -> Self {
        let response = reqwest::get(format!(
            "{}/api/chat/stream?employeeId={employee_id}",
            server.base_url()
        ))
        .await
        .expect("Failed to open stream");
        assert_eq!(response.status(), 200);
        Self {
            response,
            buffer: String::new(),
            pending: VecDeque::new(),
        }
    }

    pub async fn wait_for(&mut self, event: &str) -> Value {
        if let Some(index) = self.pending.iter().position(|(name, _)| name == event) {
            let (_, data) = self.pending.remove(index).expect("index is in range");
            return data;
        }
        loop {
            let (name, data) = timeout(RECV_TIMEOUT, self.read_event())
                .await
                .expect("Timed out waiting for event")
                .expect("Stream closed");
            if name == event {
                return data;
            }
            self.pending.push_back((name, data));
        }
    }

    pub async fn count_within(&mut self, event: &str, period: Duration) -> usize {
        let before = self.pending.len();
        self.pending.retain(|(name, _)| name != event);
        let mut count = before - self.pending.len();

        let deadline = Instant::now() + period;
        while let Ok(Some((name, data))) = timeout_at(deadline, self.read_event()).await {
            if name == event {
                count += 1;
            } else {
                self.pending.push_back((name, data));
            }
        }
        count
    }

    /// Whether the server ended the stream within `period`.
    pub async fn closed_within(&mut self, period: Duration) -> bool {
        let deadline = Instant::now() + period;
        loop {
            match timeout_at(deadline, self.read_event()).await {
                Ok(Some(event)) => self.pending.push_back(event),
                Ok(None) => return true,
                Err(_) => return false,
            }
        }
    }

    async fn read_event(&mut self) -> Option<(String, Value)> {
        loop {
            if let Some(end) = self.buffer.find("\n\n") {
                let block: String = self.buffer.drain(..end + 2).collect();
                match parse_event(&block) {
                    Some(event) => return Some(event),
                    // keep-alive comment
                    None => continue,
                }
            }
            let chunk = self.response.chunk().await.ok()??;
            self.buffer
                .push_str(std::str::from_utf8(&chunk).expect("Stream is not UTF-8"));
        }
    }
}

fn parse_event(block: &str) -> Option<(String, Value)> {
    let mut name = None;
    let mut data = None;
    for line in block.lines() {
        if let Some(value) = line.strip_prefix("event:") {
            name = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("data:") {
            data = Some(value.trim().to_string());
        }
    }
    Some((name?, serde_json::from_str(&data?).ok()?))
}
