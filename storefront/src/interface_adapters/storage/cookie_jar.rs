use async_trait::async_trait;
use cookie::Cookie;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::{Clock, CookiePolicy, CookieTier, StorageError};

struct StoredCookie {
    cookie: Cookie<'static>,
    stored_at: u64,
}

impl StoredCookie {
    fn is_live(&self, now: u64) -> bool {
        match self.cookie.max_age() {
            Some(age) if age.whole_seconds() <= 0 => false,
            Some(age) => self.stored_at + age.whole_seconds() as u64 > now,
            None => true,
        }
    }
}

// Cookie tier that honours max-age against an injected clock.
//
// The last cookie written under a name is kept even once expired so the
// matching `Set-Cookie` header can still be rendered for it.
#[derive(Clone)]
pub struct CookieJarTier<C> {
    cookies: Arc<Mutex<HashMap<String, StoredCookie>>>,
    clock: C,
}

impl<C> CookieJarTier<C>
where
    C: Clock,
{
    pub fn new(clock: C) -> Self {
        Self {
            cookies: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }

    // `Set-Cookie` value for the most recent write (or clear) of `name`.
    pub fn set_cookie_header(&self, name: &str) -> Option<String> {
        let cookies = self.cookies.lock().ok()?;
        cookies.get(name).map(|stored| stored.cookie.to_string())
    }

    fn store(&self, cookie: Cookie<'static>) -> Result<(), StorageError> {
        let mut cookies = self.cookies.lock().map_err(poisoned)?;
        let stored_at = self.clock.now_epoch_seconds();
        cookies.insert(cookie.name().to_string(), StoredCookie { cookie, stored_at });
        Ok(())
    }
}

fn poisoned<T>(_: T) -> StorageError {
    StorageError::Unavailable("cookie jar lock poisoned".to_string())
}

#[async_trait]
impl<C> CookieTier for CookieJarTier<C>
where
    C: Clock,
{
    async fn get(&self, name: &str) -> Result<Option<String>, StorageError> {
        let cookies = self.cookies.lock().map_err(poisoned)?;
        let now = self.clock.now_epoch_seconds();
        Ok(cookies
            .get(name)
            .filter(|stored| stored.is_live(now))
            .map(|stored| stored.cookie.value().to_string())
            .filter(|value| !value.is_empty()))
    }

    async fn set(
        &self,
        name: &str,
        value: &str,
        policy: &CookiePolicy,
    ) -> Result<(), StorageError> {
        self.store(policy.build(name, value))
    }

    async fn clear(&self, name: &str, policy: &CookiePolicy) -> Result<(), StorageError> {
        self.store(policy.expired(name))
    }
}
