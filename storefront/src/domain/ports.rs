use async_trait::async_trait;

use crate::domain::cookies::CookiePolicy;
use crate::domain::entities::Session;
use crate::domain::errors::{PlatformError, StorageError};

// Port for a plain key/value storage tier (tab-scoped memory, durable backup).
#[async_trait]
pub trait KeyValueTier: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// Port for the cookie tier; writes carry the cookie attributes.
#[async_trait]
pub trait CookieTier: Send + Sync {
    async fn get(&self, name: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, name: &str, value: &str, policy: &CookiePolicy)
    -> Result<(), StorageError>;
    // Clears by overwriting with max-age=0 under the attributes it was set with.
    async fn clear(&self, name: &str, policy: &CookiePolicy) -> Result<(), StorageError>;
}

// Port for asking the hosted auth provider whether a token is still live.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn fetch_session(&self, access_token: Option<&str>)
    -> Result<Option<Session>, PlatformError>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;
}
