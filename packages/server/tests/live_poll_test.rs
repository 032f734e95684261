//! Integration tests for the live poll server using an in-process server.

use std::{sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tohyo_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryPollRepository, InMemoryRoomRegistry},
    },
    ui::{AppState, Server},
};
use tohyo_shared::time::{SystemClock, now_millis};
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Helper struct to manage an in-process server bound to an ephemeral port
struct TestServer {
    handle: JoinHandle<()>,
    port: u16,
    http: reqwest::Client,
}

impl TestServer {
    async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let state = AppState::new(
            Arc::new(InMemoryPollRepository::new()),
            Arc::new(WebSocketMessagePusher::new(Default::default())),
            Arc::new(InMemoryRoomRegistry::new()),
            Arc::new(SystemClock),
            Duration::from_secs(5),
        );
        let router = Server::new(state, None).router().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        TestServer {
            handle,
            port,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let response = self
            .http
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    /// Post a raw JSON body, returning the status, content type and body text
    async fn post_raw(&self, path: &str, body: &str) -> (u16, String, String) {
        let response = self
            .http
            .post(self.url(path))
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        (status, content_type, response.text().await.unwrap())
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        let response = self.http.get(self.url(path)).send().await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    async fn create_poll(&self, closes_at: Option<i64>) -> Value {
        let (status, body) = self
            .post(
                "/api/polls",
                json!({
                    "question": "Ramen or sushi?",
                    "options": ["Ramen", "Sushi"],
                    "closesAt": closes_at,
                }),
            )
            .await;
        assert_eq!(status, 201);
        body
    }

    async fn connect(&self) -> TestClient {
        let (socket, _) = connect_async(format!("ws://127.0.0.1:{}/ws", self.port))
            .await
            .unwrap();
        TestClient { socket }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Helper struct wrapping one WebSocket connection
struct TestClient {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    async fn send(&mut self, message: Value) {
        self.socket
            .send(Message::Text(message.to_string().into()))
            .await
            .unwrap();
    }

    async fn join(&mut self, poll_id: &str) {
        self.send(json!({"type": "join-poll", "pollId": poll_id}))
            .await;
    }

    /// Receive the next JSON event, failing the test after `RECV_TIMEOUT`
    async fn recv(&mut self) -> Value {
        loop {
            let message = tokio::time::timeout(RECV_TIMEOUT, self.socket.next())
                .await
                .expect("timed out waiting for an event")
                .expect("connection closed")
                .unwrap();
            if let Message::Text(text) = message {
                return serde_json::from_str(text.as_str()).unwrap();
            }
        }
    }

    /// Receive events until one of the given type arrives
    async fn recv_type(&mut self, event_type: &str) -> Value {
        loop {
            let event = self.recv().await;
            if event["type"] == event_type {
                return event;
            }
        }
    }

    async fn close(mut self) {
        self.socket.close(None).await.unwrap();
    }
}

fn votes(event: &Value) -> Vec<u64> {
    event["options"]
        .as_array()
        .unwrap()
        .iter()
        .map(|option| option["votes"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: ヘルスチェックが OK を返す
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let (status, body) = server.get("/api/health").await;

    // then (期待する結果):
    assert_eq!(status, 200);
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_create_and_fetch_poll() {
    // テスト項目: 作成した Poll を ID と ShortCode（小文字）で取得できる
    // given (前提条件):
    let server = TestServer::start().await;
    let created = server.create_poll(None).await;
    let short_code = created["shortCode"].as_str().unwrap().to_lowercase();

    // when (操作):
    let (by_id_status, by_id) = server
        .post("/api/polls/fetch", json!({"id": created["id"]}))
        .await;
    let (by_code_status, by_code) = server
        .post("/api/polls/fetch", json!({"shortCode": short_code}))
        .await;

    // then (期待する結果):
    assert_eq!(by_id_status, 200);
    assert_eq!(by_code_status, 200);
    assert_eq!(by_id, created);
    assert_eq!(by_code["id"], created["id"]);
    assert_eq!(created["status"], "open");
    assert_eq!(created["voterCount"], 0);
    assert_eq!(votes(&created), vec![0, 0]);
}

#[tokio::test]
async fn test_poll_validation_and_lookup_errors() {
    // テスト項目: 入力不足は 400、存在しない Poll は 404
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let (single_option, _) = server
        .post("/api/polls", json!({"question": "Q", "options": ["A"]}))
        .await;
    let (missing_question, _) = server
        .post("/api/polls", json!({"options": ["A", "B"]}))
        .await;
    let (no_identifier, body) = server.post("/api/polls/fetch", json!({})).await;
    let (unknown, _) = server
        .post("/api/polls/fetch", json!({"shortCode": "ZZZZZZ"}))
        .await;

    // then (期待する結果):
    assert_eq!(single_option, 400);
    assert_eq!(missing_question, 400);
    assert_eq!(no_identifier, 400);
    assert!(body["message"].is_string());
    assert_eq!(unknown, 404);
}

#[tokio::test]
async fn test_vote_scenario_over_http() {
    // テスト項目: v1→A, v2→B, v1→B で {1,0}/1 → {1,1}/2 → {0,2}/2 になる
    // given (前提条件):
    let server = TestServer::start().await;
    let poll = server.create_poll(None).await;
    let poll_id = poll["id"].as_str().unwrap();
    let option_a = poll["options"][0]["id"].as_str().unwrap();
    let option_b = poll["options"][1]["id"].as_str().unwrap();

    // when (操作) / then (期待する結果):
    let mut expected = vec![(vec![1, 0], 1), (vec![1, 1], 2), (vec![0, 2], 2)].into_iter();
    for (voter, option) in [("v1", option_a), ("v2", option_b), ("v1", option_b)] {
        let (status, body) = server
            .post(
                "/api/vote",
                json!({"pollId": poll_id, "optionId": option, "voterId": voter}),
            )
            .await;
        assert_eq!(status, 200);
        let (counts, voter_count) = expected.next().unwrap();
        assert_eq!(votes(&body["results"]), counts);
        assert_eq!(body["results"]["voterCount"], voter_count);
    }
}

#[tokio::test]
async fn test_vote_errors_over_http() {
    // テスト項目: 締め切られた Poll は 409、不正な選択肢と入力不足は 400、存在しない Poll は 404
    // given (前提条件):
    let server = TestServer::start().await;
    let open = server.create_poll(None).await;
    let closed = server.create_poll(Some(now_millis() - 1_000)).await;
    assert_eq!(closed["status"], "closed");

    // when (操作):
    let (closed_status, _) = server
        .post(
            "/api/vote",
            json!({
                "pollId": closed["id"],
                "optionId": closed["options"][0]["id"],
                "voterId": "v1",
            }),
        )
        .await;
    let (foreign_option, _) = server
        .post(
            "/api/vote",
            json!({
                "pollId": open["id"],
                "optionId": closed["options"][0]["id"],
                "voterId": "v1",
            }),
        )
        .await;
    let (missing_voter, _) = server
        .post(
            "/api/vote",
            json!({"pollId": open["id"], "optionId": open["options"][0]["id"]}),
        )
        .await;
    let (unknown_poll, _) = server
        .post(
            "/api/vote",
            json!({"pollId": "missing", "optionId": "a", "voterId": "v1"}),
        )
        .await;

    // then (期待する結果):
    assert_eq!(closed_status, 409);
    assert_eq!(foreign_option, 400);
    assert_eq!(missing_voter, 400);
    assert_eq!(unknown_poll, 404);
    let (_, refetched) = server
        .post("/api/polls/fetch", json!({"id": closed["id"]}))
        .await;
    assert_eq!(refetched["voterCount"], 0);
}

#[tokio::test]
async fn test_undecodable_bodies_are_bad_requests() {
    // テスト項目: 型の合わない JSON や壊れた JSON は {"message"} 付きの 400 になる
    // given (前提条件):
    let server = TestServer::start().await;
    let cases = [
        ("/api/vote", r#"{"pollId":5,"optionId":"a","voterId":"v1"}"#),
        ("/api/vote", "{not json"),
        ("/api/polls", r#"{"question":"Q","options":"A"}"#),
        ("/api/polls/fetch", r#"["id"]"#),
    ];

    for (path, body) in cases {
        // when (操作):
        let (status, content_type, text) = server.post_raw(path, body).await;

        // then (期待する結果):
        assert_eq!(status, 400, "{path} {body}");
        assert!(content_type.starts_with("application/json"), "{content_type}");
        let json: Value = serde_json::from_str(&text).unwrap();
        assert!(json["message"].as_str().unwrap().starts_with("Invalid request body"));
    }
}

#[tokio::test]
async fn test_room_receives_votes_and_presence() {
    // テスト項目: Room のメンバーは参加人数と投票結果をリアルタイムに受け取る
    // given (前提条件):
    let server = TestServer::start().await;
    let poll = server.create_poll(None).await;
    let poll_id = poll["id"].as_str().unwrap();

    let mut alice = server.connect().await;
    alice.join(poll_id).await;
    let snapshot = alice.recv().await;
    assert_eq!(snapshot["type"], "new-vote");
    assert_eq!(snapshot["voterCount"], 0);
    let presence = alice.recv().await;
    assert_eq!(presence["type"], "participant-update");
    assert_eq!(presence["participantCount"], 1);

    let mut bob = server.connect().await;
    bob.join(poll_id).await;
    assert_eq!(bob.recv_type("participant-update").await["participantCount"], 2);
    assert_eq!(alice.recv().await["participantCount"], 2);

    let (_, count) = server
        .get(&format!("/api/polls/{}/participants", poll_id))
        .await;
    assert_eq!(count["participantCount"], 2);

    // when (操作): HTTP で投票する
    let (status, _) = server
        .post(
            "/api/vote",
            json!({"pollId": poll_id, "optionId": poll["options"][1]["id"], "voterId": "v1"}),
        )
        .await;
    assert_eq!(status, 200);

    // then (期待する結果): 両方のメンバーに新しい集計が届く
    for client in [&mut alice, &mut bob] {
        let update = client.recv_type("new-vote").await;
        assert_eq!(update["pollId"], poll_id);
        assert_eq!(update["voterCount"], 1);
        assert_eq!(update["version"], 1);
        assert_eq!(votes(&update), vec![0, 1]);
    }

    // when (操作): bob が切断する
    bob.close().await;

    // then (期待する結果): alice に退出後の人数が届く
    let presence = alice.recv_type("participant-update").await;
    assert_eq!(presence["participantCount"], 1);
}

#[tokio::test]
async fn test_leave_poll_updates_presence() {
    // テスト項目: leave-poll で退出すると残りのメンバーに人数が通知される
    // given (前提条件):
    let server = TestServer::start().await;
    let poll = server.create_poll(None).await;
    let poll_id = poll["id"].as_str().unwrap();
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    alice.join(poll_id).await;
    alice.recv_type("participant-update").await;
    bob.join(poll_id).await;
    bob.recv_type("participant-update").await;
    alice.recv_type("participant-update").await;

    // when (操作):
    bob.send(json!({"type": "leave-poll", "pollId": poll_id}))
        .await;

    // then (期待する結果):
    let presence = alice.recv_type("participant-update").await;
    assert_eq!(presence["participantCount"], 1);
}

#[tokio::test]
async fn test_join_unknown_poll_sends_error() {
    // テスト項目: 存在しない Poll への参加や不正なメッセージは、その接続にだけ error が届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    // when (操作):
    client.join("no-such-poll").await;
    let unknown = client.recv().await;
    client.send(json!({"type": "shout"})).await;
    let malformed = client.recv().await;

    // then (期待する結果):
    assert_eq!(unknown["type"], "error");
    assert!(unknown["message"].as_str().unwrap().contains("no-such-poll"));
    assert_eq!(malformed["type"], "error");
}
