// Bootstraps the real API server against an in-process mock platform.
use api_server::frameworks::config::ServerSettings;
use api_server::frameworks::server::{build_state, serve};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
};
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

pub const SERVICE_KEY: &str = "service-key";
pub const FRONTEND_URL: &str = "http://localhost:3000";
pub const LIVE_TOKEN: &str = "live-token";

#[derive(Default)]
pub struct MockState {
    pub uploads: Mutex<Vec<String>>,
    pub recoveries: Mutex<Vec<String>>,
    pub profile: Mutex<Value>,
}

pub struct TestApp {
    pub base_url: String,
    pub platform: Arc<MockState>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn bind() -> (tokio::net::TcpListener, String) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    (listener, format!("http://{addr}"))
}

// Starts a mock platform plus the API server on ephemeral ports.
pub async fn spawn_app() -> TestApp {
    let platform = Arc::new(MockState {
        profile: Mutex::new(json!({
            "id": "user-1",
            "username": "pilot",
            "email": "pilot@example.com",
            "avatar_url": "avatars/avatars/user-1-old.png"
        })),
        ..Default::default()
    });

    let (mock_listener, mock_url) = bind().await;
    let mock = mock_platform(platform.clone());
    tokio::spawn(async move {
        axum::serve(mock_listener, mock)
            .await
            .expect("mock platform failed");
    });

    let settings = ServerSettings {
        platform_url: mock_url,
        service_key: SERVICE_KEY.to_string(),
        frontend_url: FRONTEND_URL.to_string(),
        platform_timeout: Duration::from_secs(3),
        read_retries: 0,
    };
    let state = build_state(&settings).expect("server state");
    let (listener, base_url) = bind().await;
    tokio::spawn(async move {
        serve(listener, state).await.expect("server failed");
    });

    TestApp { base_url, platform }
}

fn mock_platform(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/auth/v1/token", post(token))
        .route("/auth/v1/logout", post(logout))
        .route("/auth/v1/recover", post(recover))
        .route("/auth/v1/admin/users", post(create_user))
        .route("/auth/v1/admin/users/{id}", delete(delete_user))
        .route("/rest/v1/profiles", get(read_profile).patch(patch_profile))
        .route("/storage/v1/object/{bucket}/{key}", post(upload))
        .with_state(state)
}

fn is_service(headers: &HeaderMap) -> bool {
    headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(SERVICE_KEY)
}

fn has_bearer(headers: &HeaderMap, token: &str) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        == Some(token)
}

fn rejected(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "msg": message })))
}

async fn token(
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if params.get("grant_type").map(String::as_str) != Some("password") {
        return rejected(StatusCode::BAD_REQUEST, "unsupported grant_type");
    }
    if body["password"] != "hunter22" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "access_token": LIVE_TOKEN,
            "refresh_token": "refresh",
            "expires_in": 3600,
            "user": { "id": "user-1", "email": body["email"] }
        })),
    )
}

async fn logout(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if has_bearer(&headers, LIVE_TOKEN) {
        (StatusCode::OK, Json(json!({})))
    } else {
        rejected(StatusCode::UNAUTHORIZED, "invalid JWT")
    }
}

async fn recover(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    if let Some(redirect) = params.get("redirect_to") {
        state.recoveries.lock().unwrap().push(redirect.clone());
    }
    Json(json!({}))
}

async fn create_user(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !has_bearer(&headers, SERVICE_KEY) {
        return rejected(StatusCode::FORBIDDEN, "not admin");
    }
    (
        StatusCode::OK,
        Json(json!({ "id": "user-2", "email": body["email"] })),
    )
}

async fn delete_user(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    if id == "user-1" {
        (StatusCode::OK, Json(json!({})))
    } else {
        rejected(StatusCode::NOT_FOUND, "User not found")
    }
}

async fn read_profile(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !is_service(&headers) {
        return rejected(StatusCode::UNAUTHORIZED, "missing apikey");
    }
    let profile = state.profile.lock().unwrap().clone();
    if params.get("id").map(String::as_str) == Some("eq.user-1") {
        (StatusCode::OK, Json(json!([profile])))
    } else {
        (StatusCode::OK, Json(json!([])))
    }
}

async fn patch_profile(
    State(state): State<Arc<MockState>>,
    Json(update): Json<Value>,
) -> Json<Value> {
    let mut profile = state.profile.lock().unwrap();
    if let (Some(row), Some(fields)) = (profile.as_object_mut(), update.as_object()) {
        for (key, value) in fields {
            row.insert(key.clone(), value.clone());
        }
    }
    Json(json!([profile.clone()]))
}

async fn upload(
    State(state): State<Arc<MockState>>,
    Path((bucket, key)): Path<(String, String)>,
) -> Json<Value> {
    state.uploads.lock().unwrap().push(format!("{bucket}/{key}"));
    Json(json!({ "Key": format!("{bucket}/{key}") }))
}
