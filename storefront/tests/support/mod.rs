// In-process stand-in for the hosted platform's auth and row APIs.
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
};
use serde_json::{Value, json};
use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use storefront::interface_adapters::clients::{PlatformClient, PlatformClientConfig};
use storefront::interface_adapters::context::ClientContext;
use storefront::use_cases::retry::RetryPolicy;

#[derive(Default)]
pub struct MockState {
    pub valid_tokens: HashSet<String>,
    // Number of upcoming /auth/v1/user calls that answer 500.
    pub failing_user_calls: AtomicUsize,
    pub user_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
}

pub struct MockPlatform {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockPlatform {
    pub fn client(&self, retries: u32) -> PlatformClient {
        self.client_with_context(retries, Arc::new(ClientContext::default()))
    }

    pub fn client_with_context(&self, retries: u32, context: Arc<ClientContext>) -> PlatformClient {
        PlatformClient::new(
            PlatformClientConfig {
                base_url: self.base_url.clone(),
                anon_key: "anon-key".to_string(),
                timeout: Duration::from_secs(3),
                retry: RetryPolicy {
                    retries,
                    backoff: Duration::ZERO,
                },
            },
            context,
        )
        .expect("client should build")
    }
}

// Bind the mock to an ephemeral port on the current test runtime.
pub async fn spawn_mock_platform(valid_tokens: &[&str], failing_user_calls: usize) -> MockPlatform {
    let state = Arc::new(MockState {
        valid_tokens: valid_tokens.iter().map(|t| t.to_string()).collect(),
        failing_user_calls: AtomicUsize::new(failing_user_calls),
        ..Default::default()
    });

    let app = Router::new()
        .route("/auth/v1/user", get(current_user))
        .route("/rest/v1/profiles", get(profiles))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral mock port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock platform failed");
    });

    MockPlatform {
        base_url: format!("http://{addr}"),
        state,
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

async fn current_user(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.user_calls.fetch_add(1, Ordering::SeqCst);

    let failing = state
        .failing_user_calls
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if failing {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "auth backend unavailable"})),
        );
    }

    match bearer(&headers) {
        Some(token) if state.valid_tokens.contains(&token) => (
            StatusCode::OK,
            Json(json!({"id": "user-1", "email": "pilot@example.com", "aud": "authenticated"})),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"msg": "invalid JWT"})),
        ),
    }
}

async fn profiles(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.profile_calls.fetch_add(1, Ordering::SeqCst);

    if params.get("id").map(String::as_str) == Some("eq.user-1") {
        Json(json!([{
            "id": "user-1",
            "username": "pilot",
            "email": "pilot@example.com",
            "avatar_url": "https://host/storage/v1/object/public/avatars/avatars/user-1.png",
            "full_name": null,
            "created_at": "2024-01-01T00:00:00Z"
        }]))
    } else {
        Json(json!([]))
    }
}
