use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use storefront::interface_adapters::clients::platform::{send, upstream_error};
use storefront::use_cases::retry::RetryPolicy;
use url::Url;

use crate::domain::{
    AuthUser, NewUser, Platform, PlatformError, ProfileUpdate, Session, Upload, UserProfile,
};

// Connection settings for the hosted platform, using the service (admin) key.
#[derive(Clone, Debug)]
pub struct AdminClientConfig {
    pub base_url: String,
    pub service_key: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

// Token grant body returned by password sign-in.
#[derive(Debug, Deserialize)]
struct TokenGrant {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
    expires_at: Option<u64>,
    user: AuthUser,
}

// reqwest client for the platform's auth, row and storage APIs.
#[derive(Clone)]
pub struct PlatformAdminClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
    retry: RetryPolicy,
}

impl PlatformAdminClient {
    pub fn new(config: AdminClientConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            service_key: config.service_key,
            retry: config.retry,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, PlatformError> {
        Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|err| PlatformError::Transport(format!("invalid platform url: {err}")))
    }

    // Each segment is percent-encoded, so ids cannot add or climb path levels.
    fn endpoint_segments(&self, segments: &[&str]) -> Result<Url, PlatformError> {
        if let Some(bad) = segments
            .iter()
            .find(|segment| matches!(segment.trim(), "" | "." | ".."))
        {
            return Err(PlatformError::Transport(format!(
                "invalid platform path segment: {bad:?}"
            )));
        }

        let mut url = self.endpoint("")?;
        url.path_segments_mut()
            .map_err(|()| PlatformError::Transport("platform url cannot take a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // Admin calls authenticate as the service role.
    fn as_service(&self, request: RequestBuilder) -> RequestBuilder {
        self.as_user(request, &self.service_key)
    }

    fn as_user(&self, request: RequestBuilder, access_token: &str) -> RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(access_token)
    }

    fn profile_url(&self, user_id: &str) -> Result<Url, PlatformError> {
        let mut url = self.endpoint("/rest/v1/profiles")?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{user_id}"))
            .append_pair("select", "*");
        Ok(url)
    }
}

async fn expect_success(response: Response) -> Result<Response, PlatformError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(upstream_error(response).await)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, PlatformError> {
    expect_success(response)
        .await?
        .json::<T>()
        .await
        .map_err(|err| PlatformError::Decode(err.to_string()))
}

fn first_profile(rows: Vec<UserProfile>) -> Result<UserProfile, PlatformError> {
    rows.into_iter()
        .next()
        .ok_or(PlatformError::NotFound { entity: "profile" })
}

fn now_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[async_trait]
impl Platform for PlatformAdminClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, PlatformError> {
        let mut url = self.endpoint("/auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let request = self
            .http
            .post(url)
            .header("apikey", &self.service_key)
            .json(&json!({ "email": email, "password": password }));
        let grant: TokenGrant = decode(send(request).await?).await?;

        let expires_at = grant
            .expires_at
            .or_else(|| grant.expires_in.map(|ttl| now_epoch_seconds() + ttl));
        Ok(Session {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            expires_at,
            user: grant.user,
        })
    }

    async fn create_user(&self, user: &NewUser) -> Result<AuthUser, PlatformError> {
        let url = self.endpoint("/auth/v1/admin/users")?;
        let request = self.as_service(self.http.post(url)).json(&json!({
            "email": user.email,
            "password": user.password,
            "email_confirm": true,
            "user_metadata": { "username": user.username },
        }));

        decode(send(request).await?).await
    }

    async fn send_recovery(&self, email: &str, redirect_to: &str) -> Result<(), PlatformError> {
        let mut url = self.endpoint("/auth/v1/recover")?;
        url.query_pairs_mut().append_pair("redirect_to", redirect_to);

        let request = self
            .http
            .post(url)
            .header("apikey", &self.service_key)
            .json(&json!({ "email": email }));
        expect_success(send(request).await?).await?;
        Ok(())
    }

    async fn update_password(
        &self,
        access_token: &str,
        password: &str,
    ) -> Result<AuthUser, PlatformError> {
        let url = self.endpoint("/auth/v1/user")?;
        let request = self
            .as_user(self.http.put(url), access_token)
            .json(&json!({ "password": password }));

        decode(send(request).await?).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), PlatformError> {
        let url = self.endpoint("/auth/v1/logout")?;
        let request = self.as_user(self.http.post(url), access_token);
        expect_success(send(request).await?).await?;
        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, PlatformError> {
        let url = self.profile_url(user_id)?;
        let url = &url;

        let rows: Vec<UserProfile> = self
            .retry
            .run("get_profile", move || async move {
                let request = self.as_service(self.http.get(url.clone()));
                decode(send(request).await?).await
            })
            .await?;

        first_profile(rows)
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, PlatformError> {
        let url = self.profile_url(user_id)?;
        let request = self
            .as_service(self.http.patch(url))
            .header("Prefer", "return=representation")
            .json(update);

        first_profile(decode(send(request).await?).await?)
    }

    async fn upload_object(&self, upload: Upload) -> Result<(), PlatformError> {
        let url = self.endpoint_segments(&[
            "storage",
            "v1",
            "object",
            upload.bucket.as_str(),
            upload.key.as_str(),
        ])?;
        let request = self
            .as_service(self.http.post(url))
            .header("content-type", upload.content_type)
            .header("x-upsert", "true")
            .body(upload.bytes);

        expect_success(send(request).await?).await?;
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), PlatformError> {
        let url = self.endpoint_segments(&["auth", "v1", "admin", "users", user_id])?;
        let request = self.as_service(self.http.delete(url));

        expect_success(send(request).await?).await?;
        Ok(())
    }
}
