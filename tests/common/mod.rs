// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Form, Json, Router,
};
use guild_dashboard_api::config::Config;
use guild_dashboard_api::db::{FirestoreDb, MemoryStore, StatsStore};
use guild_dashboard_api::routes::create_router;
use guild_dashboard_api::services::{DiscordService, StatsService};
use guild_dashboard_api::AppState;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BOT_TOKEN: &str = "test_bot_token";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a connection to the Firestore emulator.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project", None)
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Canned Discord behaviour plus a record of what was called.
#[allow(dead_code)]
pub struct MockDiscord {
    pub calls: AtomicUsize,
    pub token_status: StatusCode,
    pub token_body: Value,
    pub user_guilds: Value,
    pub bot_guilds: Value,
    pub bot_guilds_status: StatusCode,
    pub user: Value,
    /// Latency added to every `/users/@me/guilds` answer
    pub guilds_delay: Duration,
    pub last_token_form: Mutex<HashMap<String, String>>,
}

impl Default for MockDiscord {
    fn default() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            token_status: StatusCode::OK,
            token_body: json!({ "access_token": "tok1", "token_type": "Bearer" }),
            user_guilds: json!([]),
            bot_guilds: json!([]),
            bot_guilds_status: StatusCode::OK,
            user: json!({ "id": "42", "username": "alice" }),
            guilds_delay: Duration::ZERO,
            last_token_form: Mutex::new(HashMap::new()),
        }
    }
}

#[allow(dead_code)]
impl MockDiscord {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

async fn token(
    State(mock): State<Arc<MockDiscord>>,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    mock.calls.fetch_add(1, Ordering::SeqCst);
    *mock.last_token_form.lock().unwrap() = form;
    (mock.token_status, Json(mock.token_body.clone()))
}

async fn guilds(State(mock): State<Arc<MockDiscord>>, headers: HeaderMap) -> impl IntoResponse {
    mock.calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(mock.guilds_delay).await;
    let auth = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");

    if auth == format!("Bot {}", BOT_TOKEN) {
        (mock.bot_guilds_status, Json(mock.bot_guilds.clone()))
    } else if auth == "Bearer tok1" {
        (StatusCode::OK, Json(mock.user_guilds.clone()))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "401: Unauthorized", "code": 0 })),
        )
    }
}

async fn me(State(mock): State<Arc<MockDiscord>>) -> impl IntoResponse {
    mock.calls.fetch_add(1, Ordering::SeqCst);
    Json(mock.user.clone())
}

/// Serve `mock` on a loopback port and return its base URL.
#[allow(dead_code)]
pub async fn spawn_mock_discord(mock: Arc<MockDiscord>) -> String {
    let app = Router::new()
        .route("/oauth2/token", post(token))
        .route("/users/@me/guilds", get(guilds))
        .route("/users/@me", get(me))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock Discord listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Build the app around a given config and store.
#[allow(dead_code)]
pub fn create_app(config: Config, store: Arc<dyn StatsStore>) -> (axum::Router, Arc<AppState>) {
    let discord = DiscordService::new(&config).expect("Discord client");
    let stats = StatsService::new(store, config.upstream_timeout);

    let state = Arc::new(AppState {
        config,
        discord,
        stats,
    });

    (create_router(state.clone()), state)
}

/// Test app backed by an in-memory store.
#[allow(dead_code)]
pub fn create_test_app(store: Arc<MemoryStore>) -> axum::Router {
    create_app(Config::default(), store).0
}

/// Test app whose Firestore client is offline.
#[allow(dead_code)]
pub fn create_offline_app() -> axum::Router {
    create_app(Config::default(), Arc::new(FirestoreDb::new_mock())).0
}

/// Test app pointed at a mock Discord server.
#[allow(dead_code)]
pub async fn create_oauth_app(mock: Arc<MockDiscord>, mut config: Config) -> axum::Router {
    config.discord_api_base = spawn_mock_discord(mock).await;
    create_app(config, Arc::new(MemoryStore::new())).0
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
