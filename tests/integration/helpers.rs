//! Shared test helpers for integration tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, Query, State, WebSocketUpgrade};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Json;
use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::sync::broadcast;

use gymhub_core::config::api::ApiConfig;
use gymhub_core::config::notifications::NotificationsConfig;
use gymhub_core::config::realtime::RealtimeConfig;
use gymhub_client::HttpNotificationClient;
use gymhub_realtime::WsLiveConnector;
use gymhub_service::NotificationStore;

/// Backend state shared with the handlers.
pub struct BackendState {
    notifications: Mutex<HashMap<String, Vec<Value>>>,
    pub mark_read_calls: Mutex<Vec<(String, String)>>,
    pub authorization: Mutex<Vec<Option<String>>>,
    pub ws_tokens: Mutex<Vec<Option<String>>>,
    pub subscriptions: Mutex<Vec<String>>,
    pub pongs: AtomicUsize,
    pub closed_sockets: AtomicUsize,
    pub fail_fetch: AtomicBool,
    pub fail_mark_read: AtomicBool,
    created: AtomicUsize,
    live: broadcast::Sender<(String, String)>,
}

/// A mock notification backend listening on an ephemeral port.
pub struct MockBackend {
    pub addr: SocketAddr,
    pub state: Arc<BackendState>,
}

impl MockBackend {
    /// Start the backend
    pub async fn start() -> Self {
        let (live, _) = broadcast::channel(64);
        let state = Arc::new(BackendState {
            notifications: Mutex::new(HashMap::new()),
            mark_read_calls: Mutex::new(Vec::new()),
            authorization: Mutex::new(Vec::new()),
            ws_tokens: Mutex::new(Vec::new()),
            subscriptions: Mutex::new(Vec::new()),
            pongs: AtomicUsize::new(0),
            closed_sockets: AtomicUsize::new(0),
            fail_fetch: AtomicBool::new(false),
            fail_mark_read: AtomicBool::new(false),
            created: AtomicUsize::new(0),
            live,
        });

        let router = Router::new()
            .route("/api/notifications/create", post(create))
            .route("/api/notifications/{user_id}", get(fetch))
            .route("/api/notifications/{user_id}/{id}/read", post(mark_read))
            .route("/ws", get(ws_upgrade))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("No local address");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Mock backend failed");
        });

        Self { addr, state }
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: format!("http://{}/api", self.addr),
            timeout_seconds: 5,
        }
    }

    pub fn realtime_config(&self) -> RealtimeConfig {
        RealtimeConfig {
            enabled: true,
            url: format!("ws://{}/ws", self.addr),
            connect_timeout_seconds: 5,
            channel_buffer_size: 16,
        }
    }

    pub fn client(&self) -> HttpNotificationClient {
        HttpNotificationClient::new(&self.api_config()).expect("Failed to build client")
    }

    /// Store wired to this backend over HTTP and WebSocket.
    pub fn store(&self) -> NotificationStore {
        NotificationStore::builder()
            .transport(Arc::new(self.client()))
            .connector(Arc::new(WsLiveConnector::new(&self.realtime_config())))
            .config(NotificationsConfig::default())
            .build()
            .expect("Failed to build store")
    }

    /// Seed the stored list for `user`, newest first.
    pub fn seed(&self, user: &str, list: Vec<Value>) {
        self.state
            .notifications
            .lock()
            .unwrap()
            .insert(user.to_string(), list);
    }

    /// Push a `new_notification` frame to every socket subscribed to `user`.
    pub fn push(&self, user: &str, notification: Value) {
        let frame = json!({ "type": "new_notification", "notification": notification });
        let _ = self
            .state
            .live
            .send((channel(user), frame.to_string()));
    }

    /// Push a raw text frame to every socket subscribed to `user`.
    pub fn push_raw(&self, user: &str, frame: &str) {
        let _ = self.state.live.send((channel(user), frame.to_string()));
    }

    pub fn subscription_count(&self) -> usize {
        self.state.subscriptions.lock().unwrap().len()
    }

    pub fn mark_read_calls(&self) -> Vec<(String, String)> {
        self.state.mark_read_calls.lock().unwrap().clone()
    }
}

/// A notification record as the backend serializes it.
pub fn notification_json(id: &str, user: &str, kind: &str, read: bool) -> Value {
    json!({
        "_id": id,
        "userId": user,
        "title": format!("Title {id}"),
        "message": "Body",
        "type": kind,
        "isRead": read,
        "createdAt": "2026-01-05T10:00:00Z",
    })
}

/// Poll until `check` holds.
pub async fn eventually(mut check: impl FnMut() -> bool) {
    for _ in 0..400 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

fn channel(user: &str) -> String {
    format!("notifications:{user}")
}

async fn fetch(
    State(state): State<Arc<BackendState>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.authorization.lock().unwrap().push(auth);

    if state.fail_fetch.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database down").into_response();
    }
    let list = state
        .notifications
        .lock()
        .unwrap()
        .get(&user_id)
        .cloned()
        .unwrap_or_default();
    Json(json!({ "success": true, "data": list })).into_response()
}

async fn mark_read(
    State(state): State<Arc<BackendState>>,
    Path((user_id, id)): Path<(String, String)>,
) -> Response {
    state
        .mark_read_calls
        .lock()
        .unwrap()
        .push((user_id.clone(), id.clone()));

    if state.fail_mark_read.load(Ordering::SeqCst) {
        return (StatusCode::SERVICE_UNAVAILABLE, "try later").into_response();
    }
    let mut all = state.notifications.lock().unwrap();
    let found = all
        .get_mut(&user_id)
        .and_then(|list| list.iter_mut().find(|n| n["_id"] == id.as_str()));
    match found {
        Some(n) => {
            n["isRead"] = json!(true);
            Json(n.clone()).into_response()
        }
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn create(State(state): State<Arc<BackendState>>, Json(payload): Json<Value>) -> Response {
    let n = state.created.fetch_add(1, Ordering::SeqCst);
    let user = payload["userId"].as_str().unwrap_or_default().to_string();
    let mut record = json!({
        "_id": format!("created-{n}"),
        "userId": user,
        "title": payload["title"],
        "message": payload["message"],
        "type": payload["type"],
        "isRead": false,
        "createdAt": chrono::Utc::now().to_rfc3339(),
    });
    if let Some(url) = payload.get("redirectUrl") {
        record["redirectUrl"] = url.clone();
    }

    state
        .notifications
        .lock()
        .unwrap()
        .entry(user.clone())
        .or_default()
        .insert(0, record.clone());
    let frame = json!({ "type": "new_notification", "notification": record });
    let _ = state.live.send((channel(&user), frame.to_string()));

    (StatusCode::CREATED, Json(json!({ "success": true, "data": record }))).into_response()
}

async fn ws_upgrade(
    State(state): State<Arc<BackendState>>,
    Query(query): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    state
        .ws_tokens
        .lock()
        .unwrap()
        .push(query.get("token").cloned());
    ws.on_upgrade(move |socket| serve_socket(state, socket))
}

async fn serve_socket(state: Arc<BackendState>, socket: WebSocket) {
    let (mut tx, mut rx) = socket.split();

    let channel = loop {
        match rx.next().await {
            Some(Ok(Message::Text(text))) => {
                let msg: Value = serde_json::from_str(text.as_str()).unwrap_or_default();
                if msg["type"] == "subscribe" {
                    break msg["channel"].as_str().unwrap_or_default().to_string();
                }
            }
            Some(Ok(_)) => {}
            _ => return,
        }
    };

    // Subscribe to broadcasts before announcing the subscription so no push
    // made after `subscription_count` ticks can be missed.
    let mut live = state.live.subscribe();
    let ack = json!({ "type": "subscribed", "channel": channel }).to_string();
    if tx.send(Message::Text(ack.into())).await.is_err() {
        return;
    }
    state.subscriptions.lock().unwrap().push(channel.clone());

    loop {
        tokio::select! {
            pushed = live.recv() => match pushed {
                Ok((target, frame)) if target == channel => {
                    if tx.send(Message::Text(frame.into())).await.is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => break,
            },
            inbound = rx.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    let msg: Value = serde_json::from_str(text.as_str()).unwrap_or_default();
                    if msg["type"] == "pong" {
                        state.pongs.fetch_add(1, Ordering::SeqCst);
                    }
                }
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => {}
            },
        }
    }
    state.closed_sockets.fetch_add(1, Ordering::SeqCst);
}
