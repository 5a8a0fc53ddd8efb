use std::{env, time::Duration};

pub use storefront::frameworks::config::{platform_read_retries, platform_timeout, platform_url};

pub fn http_port() -> u16 {
    env::var("API_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3001)
}

pub fn platform_service_key() -> String {
    env::var("PLATFORM_SERVICE_KEY").unwrap_or_default()
}

pub fn frontend_url() -> String {
    env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

// Everything needed to build the server state.
#[derive(Clone, Debug)]
pub struct ServerSettings {
    pub platform_url: String,
    pub service_key: String,
    pub frontend_url: String,
    pub platform_timeout: Duration,
    pub read_retries: u32,
}

impl ServerSettings {
    pub fn from_env() -> Self {
        Self {
            platform_url: platform_url(),
            service_key: platform_service_key(),
            frontend_url: frontend_url(),
            platform_timeout: platform_timeout(),
            read_retries: platform_read_retries(),
        }
    }
}
