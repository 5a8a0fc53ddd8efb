// Wiring for the client side: context, platform client and credential store.

use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::{CookiePolicy, Session, UserProfile};
use crate::frameworks::config;
use crate::interface_adapters::clients::{PlatformClient, PlatformClientConfig};
use crate::interface_adapters::clock::SystemClock;
use crate::interface_adapters::context::ClientContext;
use crate::interface_adapters::storage::{CookieJarTier, FileTier, MemoryTier};
use crate::use_cases::credential_store::{CredentialStore, WriteReport};
use crate::use_cases::retry::RetryPolicy;

pub type DefaultCredentialStore = CredentialStore<MemoryTier, CookieJarTier<SystemClock>, FileTier>;

pub struct ClientRuntime {
    pub context: Arc<ClientContext>,
    pub platform: PlatformClient,
    pub credentials: DefaultCredentialStore,
}

impl ClientRuntime {
    pub fn from_env() -> Result<Self, reqwest::Error> {
        // Load .env locally; safe to ignore when not present.
        let _ = dotenvy::dotenv();

        let context = Arc::new(ClientContext::default());
        let platform_config = PlatformClientConfig {
            base_url: config::platform_url(),
            anon_key: config::platform_anon_key(),
            timeout: config::platform_timeout(),
            retry: RetryPolicy {
                retries: config::platform_read_retries(),
                ..RetryPolicy::default()
            },
        };
        debug!(
            platform_url = %platform_config.base_url,
            timeout_ms = platform_config.timeout.as_millis() as u64,
            retries = platform_config.retry.retries,
            "platform client configured"
        );
        let platform = PlatformClient::new(platform_config, context.clone())?;

        let credentials = CredentialStore {
            session: MemoryTier::new(),
            cookies: CookieJarTier::new(SystemClock),
            backup: FileTier::new(config::session_backup_path()),
            policy: CookiePolicy::default(),
            auth_key: config::session_auth_key(),
        };

        Ok(Self {
            context,
            platform,
            credentials,
        })
    }

    pub async fn current_token(&self) -> Option<String> {
        self.credentials.get(&self.credentials.auth_key).await
    }

    // Mirrors a freshly issued session token into every tier.
    pub async fn remember(&self, session: &Session) -> WriteReport {
        self.credentials
            .set(&self.credentials.auth_key, &session.access_token)
            .await
    }

    pub async fn restore_session(&self) -> Option<Session> {
        let session = self.credentials.restore(&self.platform).await;
        if let Some(session) = &session {
            info!(user_id = %session.user.id, "session available");
        }
        session
    }

    // Loads the signed-in user's profile, degrading to the empty sentinel.
    pub async fn load_profile(&self, session: &Session) -> UserProfile {
        self.platform
            .prefetch_profile(&session.user.id, Some(&session.access_token))
            .await
    }

    pub async fn forget(&self) -> WriteReport {
        let report = self.credentials.remove(&self.credentials.auth_key).await;
        self.context.clear();
        report
    }
}
