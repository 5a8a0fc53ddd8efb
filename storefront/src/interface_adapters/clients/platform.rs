use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::domain::avatar_path::{self, StorageBase};
use crate::domain::{AuthUser, PlatformError, Session, SessionProvider, UserProfile};
use crate::interface_adapters::context::ClientContext;
use crate::use_cases::retry::RetryPolicy;

// Connection settings for the hosted platform, using the public (anon) key.
#[derive(Clone, Debug)]
pub struct PlatformClientConfig {
    pub base_url: String,
    pub anon_key: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

// Error bodies differ per platform service; take whichever field is present.
#[derive(Debug, Default, Deserialize)]
struct UpstreamErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

// Thin reqwest client for the hosted auth and row APIs.
#[derive(Clone)]
pub struct PlatformClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    retry: RetryPolicy,
    context: Arc<ClientContext>,
}

impl PlatformClient {
    pub fn new(
        config: PlatformClientConfig,
        context: Arc<ClientContext>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key,
            retry: config.retry,
            context,
        })
    }

    pub fn storage_base(&self) -> StorageBase {
        StorageBase::new(self.base_url.clone())
    }

    pub fn context(&self) -> &ClientContext {
        &self.context
    }

    // Absolute, repaired avatar URL for a profile, if it has one.
    pub fn avatar_url(&self, profile: &UserProfile) -> Option<String> {
        avatar_path::resolve(profile.avatar_url.as_deref(), &self.storage_base())
    }

    /// Reads a profile row, retrying transient failures and caching hits.
    pub async fn fetch_profile(
        &self,
        user_id: &str,
        access_token: Option<&str>,
    ) -> Result<UserProfile, PlatformError> {
        let cache_key = format!("profile:{user_id}");
        if let Some(cached) = self.context.cache.get(&cache_key) {
            if let Ok(profile) = serde_json::from_value::<UserProfile>(cached) {
                debug!(user_id, "profile served from cache");
                return Ok(profile);
            }
            self.context.cache.invalidate(&cache_key);
        }

        let mut url = self.endpoint("/rest/v1/profiles")?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{user_id}"))
            .append_pair("select", "*");

        let url = &url;
        let rows: Vec<UserProfile> = self
            .retry
            .run("fetch_profile", move || async move {
                let request = self.authorized(self.http.get(url.clone()), access_token);
                let response = send(request).await?;
                if !response.status().is_success() {
                    return Err(upstream_error(response).await);
                }
                response
                    .json::<Vec<UserProfile>>()
                    .await
                    .map_err(|err| PlatformError::Decode(err.to_string()))
            })
            .await?;

        let profile = rows
            .into_iter()
            .next()
            .ok_or(PlatformError::NotFound { entity: "profile" })?;
        if let Ok(value) = serde_json::to_value(&profile) {
            self.context.cache.insert(cache_key, value);
        }
        Ok(profile)
    }

    // Non-critical warmup read: failures yield the empty sentinel profile.
    pub async fn prefetch_profile(&self, user_id: &str, access_token: Option<&str>) -> UserProfile {
        match self.fetch_profile(user_id, access_token).await {
            Ok(profile) => profile,
            Err(err) => {
                warn!(user_id, error = %err, "profile prefetch failed");
                UserProfile::empty()
            }
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, PlatformError> {
        Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|err| PlatformError::Transport(format!("invalid platform url: {err}")))
    }

    fn authorized(&self, request: RequestBuilder, access_token: Option<&str>) -> RequestBuilder {
        let bearer = access_token.unwrap_or(&self.anon_key);
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }
}

#[async_trait]
impl SessionProvider for PlatformClient {
    async fn fetch_session(
        &self,
        access_token: Option<&str>,
    ) -> Result<Option<Session>, PlatformError> {
        let Some(token) = access_token.filter(|token| !token.is_empty()) else {
            return Ok(None);
        };
        let url = self.endpoint("/auth/v1/user")?;
        let url = &url;

        self.retry
            .run("fetch_session", move || async move {
                let request = self.authorized(self.http.get(url.clone()), Some(token));
                let response = send(request).await?;
                match response.status() {
                    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
                    status if status.is_success() => {
                        let user = response
                            .json::<AuthUser>()
                            .await
                            .map_err(|err| PlatformError::Decode(err.to_string()))?;
                        Ok(Some(Session {
                            access_token: token.to_string(),
                            refresh_token: None,
                            expires_at: None,
                            user,
                        }))
                    }
                    _ => Err(upstream_error(response).await),
                }
            })
            .await
    }
}

// Sends a request, telling timeouts apart from other transport failures.
pub async fn send(request: RequestBuilder) -> Result<Response, PlatformError> {
    request.send().await.map_err(|err| {
        if err.is_timeout() {
            PlatformError::Timeout
        } else {
            PlatformError::Transport(err.to_string())
        }
    })
}

// Keep upstream status/message so callers can show the platform's reason.
pub async fn upstream_error(response: Response) -> PlatformError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let body: UpstreamErrorBody = serde_json::from_str(&text).unwrap_or_default();
    let message = body
        .message
        .or(body.msg)
        .or(body.error_description)
        .or(body.error)
        .or_else(|| (!text.trim().is_empty()).then(|| text.trim().to_string()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    PlatformError::Upstream {
        status: status.as_u16(),
        message,
    }
}
