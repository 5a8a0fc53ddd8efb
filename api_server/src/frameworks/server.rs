// Framework bootstrap for the API server runtime.

use crate::frameworks::config::{self, ServerSettings};
use crate::interface_adapters::clients::{AdminClientConfig, PlatformAdminClient};
use crate::interface_adapters::routes::app;
use crate::interface_adapters::state::AppState;

use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
};
use std::io::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use storefront::avatar_path::StorageBase;
use storefront::use_cases::retry::RetryPolicy;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

// Serves the API on an already-bound listener using environment settings.
pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let state = build_state(&ServerSettings::from_env())?;
    serve(listener, state).await
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([0, 0, 0, 0], config::http_port()));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> Result<()> {
    let address = listener.local_addr()?;
    let app = router(state)?;

    tracing::info!(%address, "listening");

    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

// Routes plus request tracing and CORS for the configured frontend.
pub fn router(state: AppState) -> Result<Router> {
    let cors = cors_layer(&state.frontend_url)?;
    Ok(app(state).layer(TraceLayer::new_for_http()).layer(cors))
}

pub fn cors_layer(frontend_url: &str) -> Result<CorsLayer> {
    let origin = frontend_url
        .trim_end_matches('/')
        .parse::<HeaderValue>()
        .map_err(|e| std::io::Error::other(format!("invalid FRONTEND_URL: {e}")))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true))
}

pub fn build_state(settings: &ServerSettings) -> Result<AppState> {
    let client = PlatformAdminClient::new(AdminClientConfig {
        base_url: settings.platform_url.clone(),
        service_key: settings.service_key.clone(),
        timeout: settings.platform_timeout,
        retry: RetryPolicy {
            retries: settings.read_retries,
            ..RetryPolicy::default()
        },
    })
    .map_err(|e| std::io::Error::other(format!("failed to initialize platform client: {e}")))?;

    if settings.service_key.is_empty() {
        tracing::warn!("PLATFORM_SERVICE_KEY is empty; admin calls will be rejected");
    }
    tracing::debug!(
        platform_url = %client.base_url(),
        platform_timeout_ms = settings.platform_timeout.as_millis(),
        read_retries = settings.read_retries,
        "platform client configured"
    );

    Ok(AppState {
        storage: StorageBase::new(client.base_url()),
        platform: Arc::new(client),
        frontend_url: Arc::from(settings.frontend_url.trim_end_matches('/')),
    })
}
