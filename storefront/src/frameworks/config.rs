use std::{env, path::PathBuf, time::Duration};

use crate::use_cases::credential_store::DEFAULT_AUTH_KEY;

// Client-side runtime settings, read from the environment.

pub const MIN_PLATFORM_TIMEOUT: Duration = Duration::from_secs(3);
pub const MAX_PLATFORM_TIMEOUT: Duration = Duration::from_secs(10);

pub fn platform_url() -> String {
    env::var("PLATFORM_URL").unwrap_or_else(|_| "http://127.0.0.1:54321".to_string())
}

pub fn platform_anon_key() -> String {
    env::var("PLATFORM_ANON_KEY").unwrap_or_default()
}

// Outbound read timeout, clamped to 3..=10 seconds.
pub fn platform_timeout() -> Duration {
    let millis = env::var("PLATFORM_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(5000);
    clamp_timeout(Duration::from_millis(millis))
}

pub fn clamp_timeout(timeout: Duration) -> Duration {
    timeout.clamp(MIN_PLATFORM_TIMEOUT, MAX_PLATFORM_TIMEOUT)
}

pub fn platform_read_retries() -> u32 {
    env::var("PLATFORM_READ_RETRIES")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(2)
}

pub fn session_auth_key() -> String {
    env::var("SESSION_AUTH_KEY").unwrap_or_else(|_| DEFAULT_AUTH_KEY.to_string())
}

pub fn session_backup_path() -> PathBuf {
    env::var("SESSION_BACKUP_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| env::temp_dir().join("storefront").join("session_backup.json"))
}
