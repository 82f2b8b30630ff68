//! HTTP API integration tests.
//!
//! Tests for REST API endpoints (health check, chat list, history, message submission).

mod fixtures;
use fixtures::{SseClient, TestServer};
use serde_json::{Value, json};
use std::time::Duration;

#[tokio::test]
async fn test_health_endpoint() {
    // テスト項目: /api/health エンドポイントが正常に動作する
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/health", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_chats_list_endpoint() {
    // テスト項目: /api/chats エンドポイントがルーム一覧を返す
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/chats", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    let chats = body.as_array().expect("Response should be an array");
    assert_eq!(chats.len(), 2);
    assert_eq!(chats[0]["chat_id"], 1);
    assert_eq!(chats[0]["name"], "All Staff");
    assert_eq!(chats[1]["chat_id"], 2001);
    assert_eq!(chats[1]["is_group"], true);
}

#[tokio::test]
async fn test_post_message_then_fetch_history() {
    // テスト項目: HTTP で送信したメッセージが ack で返され、履歴から取得できる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .post(format!("{}/api/chats/2001/messages", server.base_url()))
        .json(&json!({ "content": "  Hello from HTTP  ", "sender_id": 2, "tempId": "http-1" }))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 201);
    let ack: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(ack["ok"], true);
    assert_eq!(ack["correlationId"], "http-1");
    assert_eq!(ack["message"]["content"], "Hello from HTTP");
    assert_eq!(ack["message"]["sender_name"], "Ben Carter");

    let history: Value = client
        .get(format!("{}/api/chats/2001/messages", server.base_url()))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    let history = history.as_array().expect("Response should be an array");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["message_id"], ack["message"]["message_id"]);
    // correlation id は永続化されない
    assert!(history[0].get("correlationId").is_none());
}

#[tokio::test]
async fn test_post_direct_message_creates_private_room() {
    // テスト項目: 1:1 メッセージはプライベートルームに保存される
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .post(format!("{}/api/chats/direct/3/messages", server.base_url()))
        .json(&json!({ "content": "Direct hello", "sender_id": 1 }))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 201);
    let ack: Value = response.json().await.expect("Failed to parse JSON");
    let chat_id = ack["message"]["chat_id"].as_i64().expect("chat_id");
    assert_ne!(chat_id, 1);
    assert_ne!(chat_id, 2001);

    let chats: Value = client
        .get(format!("{}/api/chats", server.base_url()))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(chats.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_post_invalid_message_is_bad_request() {
    // テスト項目: 空白のみのメッセージは 400 と失敗 ack になる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .post(format!("{}/api/chats/2001/messages", server.base_url()))
        .json(&json!({ "content": "   ", "sender_id": 1, "correlationId": "tmp-9" }))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 400);
    let ack: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(ack["ok"], false);
    assert_eq!(ack["correlationId"], "tmp-9");
    assert!(ack["error"].as_str().is_some());
}

#[tokio::test]
async fn test_post_to_unknown_room_is_bad_gateway() {
    // テスト項目: 永続化に失敗したメッセージは 502 になる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .post(format!("{}/api/chats/404/messages", server.base_url()))
        .json(&json!({ "content": "anyone?", "sender_id": 1 }))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 502);
    let ack: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(ack["ok"], false);
}

#[tokio::test]
async fn test_history_of_unknown_room_is_not_found() {
    // テスト項目: 存在しないルームの履歴は 404 になる
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let response = reqwest::get(format!("{}/api/chats/404/messages", server.base_url()))
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_stream_without_employee_id_is_rejected() {
    // テスト項目: employeeId がない、または不正なストリーム接続は 400 になる
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let missing = reqwest::get(format!("{}/api/chat/stream", server.base_url()))
        .await
        .expect("Failed to send request");
    let zero = reqwest::get(format!("{}/api/chat/stream?employeeId=0", server.base_url()))
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(missing.status(), 400);
    assert_eq!(zero.status(), 400);
}

#[tokio::test]
async fn test_connections_snapshot_counts_streams() {
    // テスト項目: /api/connections が従業員ごとの接続数を返す
    // given (前提条件):
    let server = TestServer::start().await;
    let _first = SseClient::connect(&server, 1).await;
    let _second = SseClient::connect(&server, 1).await;
    let _third = SseClient::connect(&server, 3).await;

    // when (操作):
    let body: Value = reqwest::get(format!("{}/api/connections", server.base_url()))
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");

    // then (期待する結果):
    assert_eq!(
        body,
        json!([
            { "employeeId": 1, "connections": 2 },
            { "employeeId": 3, "connections": 1 }
        ])
    );
}

#[tokio::test]
async fn test_graceful_shutdown_closes_open_streams() {
    // テスト項目: イベントストリームが開いていても、終了シグナルでサーバーが停止する
    // given (前提条件):
    let (mut server, trigger) = TestServer::start_with_shutdown().await;
    let mut stream = SseClient::connect(&server, 1).await;
    stream.wait_for("connected").await;

    // when (操作):
    trigger.send(()).expect("Server already stopped");

    // then (期待する結果):
    assert!(stream.closed_within(Duration::from_secs(3)).await);
    assert!(server.stopped_within(Duration::from_secs(3)).await);
}
